//! Random test data generators using the fake crate
//!
//! Provides random data for example-style tests and proptest strategies for
//! property runs.

use fake::faker::lorem::en::{Word, Words};
use fake::Fake;
use proptest::prelude::*;
use rand::Rng;

use crate::services::Product;

/// Generate a random product name such as "Product amet"
pub fn generate_product_name() -> String {
    let word: String = Word().fake();
    format!("Product {word}")
}

/// Generate a random product
pub fn generate_random_product() -> Product {
    let id: i32 = (1..99_999).fake();
    Product::new(id, generate_product_name())
}

/// Generate a random sentence-like string to feed into string services
pub fn generate_text() -> String {
    let words: Vec<String> = Words(0..6).fake();
    words.join(" ")
}

/// Generate `count` random strings, sometimes repeating earlier ones
pub fn generate_texts(count: usize) -> Vec<String> {
    let mut rng = rand::thread_rng();
    let mut texts: Vec<String> = Vec::with_capacity(count);
    for _ in 0..count {
        if !texts.is_empty() && rng.gen_bool(0.2) {
            let index = rng.gen_range(0..texts.len());
            texts.push(texts[index].clone());
        } else {
            texts.push(generate_text());
        }
    }
    texts
}

/// Proptest strategy for products named after their id
pub fn product_strategy() -> impl Strategy<Value = Product> {
    any::<i32>().prop_map(|id| Product::new(id, format!("Product {id}")))
}

/// Proptest strategy for arbitrary, possibly non-ASCII strings
pub fn text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-z]{1,12}",
        any::<String>(),
    ]
}

/// Proptest strategy for a pair of strings
pub fn text_pair_strategy() -> impl Strategy<Value = (String, String)> {
    (text_strategy(), text_strategy())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_product_name_has_prefix() {
        for _ in 0..20 {
            let product = generate_random_product();
            assert!(product.name.starts_with("Product "));
            assert!(product.id > 0);
        }
    }

    #[test]
    fn test_generate_texts_count() {
        assert_eq!(generate_texts(0).len(), 0);
        assert_eq!(generate_texts(7).len(), 7);
    }

    proptest! {
        #[test]
        fn test_product_strategy_names_match_ids(product in product_strategy()) {
            prop_assert_eq!(product.name, format!("Product {}", product.id));
        }
    }
}
