//! Contains the contracts that a test template is written against, and the
//! [Template] definition itself.
//!
//! A template never holds the item it is testing. Instead, each test body
//! receives a generated case through one of the capability traits
//! ([TestUsingType] or [TestUsingObject]) and asks it for the bound item.
use std::{
    any::{type_name, TypeId},
    borrow::Cow,
    fmt,
    sync::Arc,
};

use derive_more::Display;

use crate::error::TestResult;

/// Base contract for anything that is bound to an item under test.
pub trait TestUsing {
    /// The generated name of the test case.
    fn name(&self) -> &str;
}

/// A test case that is parameterised by a type.
pub trait TestUsingType: TestUsing {
    /// Get the type to use in the test.
    fn type_to_test(&self) -> TypeHandle;
}

/// A test case that is parameterised by an object.
pub trait TestUsingObject: TestUsing {
    /// The type of the object under test.
    type Object;

    /// Get the object to use in the test.
    ///
    /// N.B. this is the exact instance that was given to the generator, not a
    /// copy, so [Arc::ptr_eq] can be used to check identity.
    fn object_to_test(&self) -> &Arc<Self::Object>;
}

/// The two kinds of item that a test can be parameterised with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TestKind {
    #[display("type")]
    Type,
    #[display("object")]
    Object,
}

/// A runtime handle to a Rust type, this is the "bound item" of type
/// parameterised tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeHandle {
    id: TypeId,
    full_name: &'static str,
}

impl TypeHandle {
    /// Create a [TypeHandle] for `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self { id: TypeId::of::<T>(), full_name: type_name::<T>() }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The fully qualified name of the type, as reported by
    /// [std::any::type_name].
    pub fn full_name(&self) -> &'static str {
        self.full_name
    }

    /// The name of the type with all module paths removed, i.e.
    /// `alloc::vec::Vec<alloc::string::String>` becomes `Vec<String>`.
    pub fn name(&self) -> Cow<'static, str> {
        short_type_name(self.full_name)
    }

    /// Check whether this handle refers to `T`.
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Strip the module paths from every path segment within the given type
/// name.
pub fn short_type_name(full_name: &'static str) -> Cow<'static, str> {
    if !full_name.contains("::") {
        return Cow::Borrowed(full_name);
    }

    let mut short = String::with_capacity(full_name.len());
    let mut segment_start = 0;
    let mut chars = full_name.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                short.truncate(segment_start);
            }
            ch if ch.is_alphanumeric() || ch == '_' => short.push(ch),
            ch => {
                short.push(ch);
                segment_start = short.len();
            }
        }
    }

    Cow::Owned(short)
}

/// The body of a single test within a [Template].
pub type TestBody<C> = Arc<dyn Fn(&C) -> TestResult + Send + Sync>;

/// A named test body within a [Template].
pub struct TemplateTest<C: ?Sized> {
    name: String,
    body: TestBody<C>,
}

impl<C: ?Sized> TemplateTest<C> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the test body against the given case.
    pub fn run(&self, case: &C) -> TestResult {
        (self.body)(case)
    }
}

impl<C: ?Sized> Clone for TemplateTest<C> {
    fn clone(&self) -> Self {
        Self { name: self.name.clone(), body: self.body.clone() }
    }
}

/// An abstract test case definition. The template describes what to test,
/// whilst the generated cases describe what to test it with. `C` is the
/// capability that the test bodies are written against, see [TypeTemplate]
/// and [ObjectTemplate].
pub struct Template<C: ?Sized> {
    name: String,
    tests: Vec<TemplateTest<C>>,
}

/// A template whose tests are parameterised by a type.
pub type TypeTemplate = Template<dyn TestUsingType>;

/// A template whose tests are parameterised by an object of type `O`.
pub type ObjectTemplate<O> = Template<dyn TestUsingObject<Object = O>>;

impl<C: ?Sized> Template<C> {
    /// Create a new [Template] with no tests.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), tests: vec![] }
    }

    /// Add a test to the template. Tests run in the order that they were
    /// added.
    pub fn with_test(
        mut self,
        name: impl Into<String>,
        body: impl Fn(&C) -> TestResult + Send + Sync + 'static,
    ) -> Self {
        self.tests.push(TemplateTest { name: name.into(), body: Arc::new(body) });
        self
    }

    /// The name of the template, this is passed to test namers.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tests(&self) -> impl Iterator<Item = &TemplateTest<C>> {
        self.tests.iter()
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

impl<C: ?Sized> fmt::Debug for Template<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("name", &self.name)
            .field("tests", &self.tests.iter().map(TemplateTest::name).collect::<Vec<_>>())
            .finish()
    }
}
