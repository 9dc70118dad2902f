//! Stub and invocation recorder for a single mocked method

use parking_lot::Mutex;
use std::fmt;

/// Records calls to one mocked method and answers them from stubbings.
///
/// `A` is the argument value (use a tuple for several arguments) and `R` the
/// stubbed answer. When several stubbings match the same arguments the most
/// recent one wins.
pub struct MockMethod<A, R> {
    name: String,
    state: Mutex<MethodState<A, R>>,
}

struct MethodState<A, R> {
    stubbings: Vec<Stubbing<A, R>>,
    invocations: Vec<A>,
}

struct Stubbing<A, R> {
    args: A,
    answer: R,
    used: bool,
}

/// Stubbing under construction, finished by [`then_return`](Self::then_return)
#[must_use = "a stubbing has no effect until then_return is called"]
pub struct OngoingStubbing<'m, A, R> {
    method: &'m MockMethod<A, R>,
    args: A,
}

impl<A, R> OngoingStubbing<'_, A, R> {
    /// Answer calls with matching arguments with `answer`
    pub fn then_return(self, answer: R) {
        self.method.state.lock().stubbings.push(Stubbing {
            args: self.args,
            answer,
            used: false,
        });
    }
}

impl<A, R> MockMethod<A, R>
where
    A: PartialEq + Clone + fmt::Debug,
    R: Clone,
{
    /// Create a recorder named after the mocked method
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Mutex::new(MethodState {
                stubbings: Vec::new(),
                invocations: Vec::new(),
            }),
        }
    }

    /// Method name used in diagnostics
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start stubbing calls with `args`
    pub fn when(&self, args: A) -> OngoingStubbing<'_, A, R> {
        OngoingStubbing { method: self, args }
    }

    /// Record a call and return the stubbed answer, if any
    pub fn invoke(&self, args: A) -> Option<R> {
        let mut state = self.state.lock();
        let answer = state
            .stubbings
            .iter_mut()
            .rev()
            .find(|stubbing| stubbing.args == args)
            .map(|stubbing| {
                stubbing.used = true;
                stubbing.answer.clone()
            });
        state.invocations.push(args);
        answer
    }

    /// Record a call and answer it from a stubbing or, failing that, from `real`.
    ///
    /// Spies use this to delegate to the wrapped implementation. The lock is
    /// released before `real` runs.
    pub fn invoke_or_else(&self, args: A, real: impl FnOnce(&A) -> R) -> R {
        match self.invoke(args.clone()) {
            Some(answer) => answer,
            None => real(&args),
        }
    }

    /// Recorded arguments in call order
    pub fn invocations(&self) -> Vec<A> {
        self.state.lock().invocations.clone()
    }

    pub fn times_invoked(&self) -> usize {
        self.state.lock().invocations.len()
    }

    /// Number of recorded calls with exactly these arguments
    pub fn times_invoked_with(&self, args: &A) -> usize {
        self.state
            .lock()
            .invocations
            .iter()
            .filter(|recorded| *recorded == args)
            .count()
    }

    pub fn stub_count(&self) -> usize {
        self.state.lock().stubbings.len()
    }

    /// Stubbings never matched by a call, rendered as `name(args)`
    pub fn unused_stubbings(&self) -> Vec<String> {
        self.state
            .lock()
            .stubbings
            .iter()
            .filter(|stubbing| !stubbing.used)
            .map(|stubbing| format!("{}({:?})", self.name, stubbing.args))
            .collect()
    }

    /// Drop all stubbings and recorded calls
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.stubbings.clear();
        state.invocations.clear();
    }
}

impl<A, R> fmt::Debug for MockMethod<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MockMethod")
            .field("name", &self.name)
            .field("stubbings", &state.stubbings.len())
            .field("invocations", &state.invocations.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn length_method() -> MockMethod<String, i32> {
        MockMethod::new("CountingService::string_length")
    }

    #[test]
    fn test_unstubbed_call_is_recorded() {
        let method = length_method();

        assert_eq!(method.invoke("abc".to_string()), None);
        assert_eq!(method.times_invoked(), 1);
        assert_eq!(method.invocations(), vec!["abc".to_string()]);
    }

    #[test]
    fn test_stubbed_call_returns_answer() {
        let method = length_method();
        method.when("a".to_string()).then_return(1);
        method.when("bb".to_string()).then_return(2);

        assert_eq!(method.invoke("bb".to_string()), Some(2));
        assert_eq!(method.invoke("a".to_string()), Some(1));
        assert_eq!(method.times_invoked_with(&"a".to_string()), 1);
    }

    #[test]
    fn test_latest_stubbing_wins() {
        let method = length_method();
        method.when("x".to_string()).then_return(1);
        method.when("x".to_string()).then_return(5);

        assert_eq!(method.invoke("x".to_string()), Some(5));
        assert_eq!(method.unused_stubbings(), vec![r#"CountingService::string_length("x")"#]);
    }

    #[test]
    fn test_invoke_or_else_delegates_when_unstubbed() {
        let method: MockMethod<String, usize> = MockMethod::new("Logger::log");
        method.when("stubbed".to_string()).then_return(0);

        assert_eq!(method.invoke_or_else("real".to_string(), |s| s.len()), 4);
        assert_eq!(method.invoke_or_else("stubbed".to_string(), |s| s.len()), 0);
        assert_eq!(method.times_invoked(), 2);
    }

    #[test]
    fn test_reset_clears_stubs_and_calls() {
        let method = length_method();
        method.when("a".to_string()).then_return(1);
        method.invoke("a".to_string());

        method.reset();

        assert_eq!(method.times_invoked(), 0);
        assert_eq!(method.stub_count(), 0);
        assert!(method.unused_stubbings().is_empty());
        assert_eq!(method.invoke("a".to_string()), None);
    }
}
