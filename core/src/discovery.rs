//! Mock discovery over explicitly registered test instance fields
//!
//! Test instances list their fields through [`Fields`] in declaration
//! order. A field is a mock when it carries the [`Marker::Mock`] or
//! [`Marker::Spy`] marker, or when its value implements [`Mock`].

use std::sync::Arc;
use tracing::{trace, warn};

use crate::error::{LifecycleError, Result};
use crate::mocking::{Mock, MockRef, MockSet, MockSlot};

/// Marker placed on a test instance field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Field holds a mock created by the session
    Mock,
    /// Field holds a spy created by the session
    Spy,
    /// Field captures arguments for verification
    Captor,
    /// Field holds the subject that receives the mocks
    InjectMocks,
}

/// Markers that identify mock-bearing fields
pub const MOCKING_MARKERS: [Marker; 2] = [Marker::Mock, Marker::Spy];

/// Read access to the value of a test instance field.
pub trait FieldAccessor: Send + Sync {
    /// The field value as a mock, `None` if it holds no mock.
    ///
    /// Returns `Err` with a reason when the field cannot be read.
    fn read(&self) -> std::result::Result<Option<MockRef>, String>;

    /// Create the mock of an annotated field that is still empty.
    ///
    /// Returns `true` if a mock was created.
    fn init_mock(&self) -> bool {
        false
    }
}

impl<M: Mock + 'static> FieldAccessor for Arc<M> {
    fn read(&self) -> std::result::Result<Option<MockRef>, String> {
        Ok(Some(self.clone() as MockRef))
    }
}

impl<M: Mock + Default + 'static> FieldAccessor for MockSlot<M> {
    fn read(&self) -> std::result::Result<Option<MockRef>, String> {
        self.try_get()
            .map(|mock| mock.map(|mock| mock as MockRef))
            .ok_or_else(|| "field is exclusively locked".to_string())
    }

    fn init_mock(&self) -> bool {
        self.init()
    }
}

struct NotAMock;

impl FieldAccessor for NotAMock {
    fn read(&self) -> std::result::Result<Option<MockRef>, String> {
        Ok(None)
    }
}

static NOT_A_MOCK: NotAMock = NotAMock;

/// A registered field of a test instance
pub struct Field<'a> {
    name: &'static str,
    markers: Vec<Marker>,
    accessor: &'a dyn FieldAccessor,
}

impl Field<'_> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Check if the field carries one of [`MOCKING_MARKERS`]
    pub fn is_mock_annotated(&self) -> bool {
        self.markers
            .iter()
            .any(|marker| MOCKING_MARKERS.contains(marker))
    }

    /// Read the field value
    pub fn read(&self) -> std::result::Result<Option<MockRef>, String> {
        self.accessor.read()
    }
}

/// Field registry filled by [`TestInstance::declare_fields`]
#[derive(Default)]
pub struct Fields<'a> {
    fields: Vec<Field<'a>>,
}

impl<'a> Fields<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a field carrying `markers`
    pub fn annotated(
        &mut self,
        name: &'static str,
        markers: &[Marker],
        accessor: &'a dyn FieldAccessor,
    ) -> &mut Self {
        self.fields.push(Field {
            name,
            markers: markers.to_vec(),
            accessor,
        });
        self
    }

    /// Register a field marked [`Marker::Mock`]
    pub fn mock(&mut self, name: &'static str, accessor: &'a dyn FieldAccessor) -> &mut Self {
        self.annotated(name, &[Marker::Mock], accessor)
    }

    /// Register a field marked [`Marker::Spy`]
    pub fn spy(&mut self, name: &'static str, accessor: &'a dyn FieldAccessor) -> &mut Self {
        self.annotated(name, &[Marker::Spy], accessor)
    }

    /// Register an unmarked field, classified by its value
    pub fn value(&mut self, name: &'static str, accessor: &'a dyn FieldAccessor) -> &mut Self {
        self.annotated(name, &[], accessor)
    }

    /// Register an argument captor field
    pub fn captor(&mut self, name: &'static str) -> &mut Self {
        self.annotated(name, &[Marker::Captor], &NOT_A_MOCK)
    }

    /// Register the field holding the subject under test
    pub fn inject_mocks(&mut self, name: &'static str) -> &mut Self {
        self.annotated(name, &[Marker::InjectMocks], &NOT_A_MOCK)
    }

    /// Register a field that never holds a mock
    pub fn plain(&mut self, name: &'static str) -> &mut Self {
        self.annotated(name, &[], &NOT_A_MOCK)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field<'a>> {
        self.fields.iter()
    }
}

/// A test instance participating in a property.
///
/// Implementations register every field they own, private ones included,
/// in declaration order.
pub trait TestInstance: Send + Sync {
    /// Name used in diagnostics
    fn instance_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn declare_fields<'a>(&'a self, fields: &mut Fields<'a>);
}

/// Collect every mock held by `instance`, in field declaration order
pub fn discover(instance: &dyn TestInstance) -> Result<Vec<MockRef>> {
    let mut fields = Fields::new();
    instance.declare_fields(&mut fields);

    let mut mocks = Vec::new();
    for field in fields.iter() {
        let value = field.read().map_err(|reason| {
            LifecycleError::access_denied(instance.instance_name(), field.name(), reason)
        })?;

        match value {
            Some(mock) => {
                trace!(
                    instance = instance.instance_name(),
                    field = field.name(),
                    mock = mock.mock_name(),
                    annotated = field.is_mock_annotated(),
                    "Discovered mock"
                );
                mocks.push(mock);
            }
            None if field.is_mock_annotated() => {
                warn!(
                    instance = instance.instance_name(),
                    field = field.name(),
                    "Annotated mock field is empty"
                );
            }
            None => {}
        }
    }

    Ok(mocks)
}

/// Collect the mocks of all instances into one set
pub fn discover_all(instances: &[Arc<dyn TestInstance>]) -> Result<MockSet> {
    let mut set = MockSet::new();
    for instance in instances {
        set.extend(discover(instance.as_ref())?);
    }
    Ok(set)
}

/// Create mocks for annotated fields that are still empty
pub fn init_annotated_mocks(instance: &dyn TestInstance) -> usize {
    let mut fields = Fields::new();
    instance.declare_fields(&mut fields);

    fields
        .iter()
        .filter(|field| field.is_mock_annotated())
        .filter(|field| field.accessor.init_mock())
        .count()
}
