//! The test case generator. Given a [Template] and a collection of items, the
//! generator creates one uniquely named test case for each item, which is
//! permanently bound to that item.
//!
//! The generated cases are returned as a mapping from the generated name to
//! the case, ready to be run from within a test harness. The
//! [`create_tests_using_types!`](crate::create_tests_using_types) and
//! [`create_tests_using_objects!`](crate::create_tests_using_objects) macros
//! can be used instead when the items are known at compile time, which makes
//! each case visible to the harness as its own test.
//!
//! [Template]: crate::template::Template
use std::{fmt, sync::Arc};

use derive_more::Constructor;
use indexmap::{map::Entry, IndexMap};
use itertools::Itertools;
use log::{debug, warn};

use crate::{
    case::{ObjectCase, TestCase, TypeCase},
    error::GeneratorError,
    settings::{GeneratorSettings, NameCollisionPolicy},
    template::{ObjectTemplate, TestKind, TypeHandle, TypeTemplate},
};

/// Generated test cases, keyed by their generated name.
pub type GeneratedTests<C> = IndexMap<String, C>;

/// The default naming scheme for type parameterised tests, `Test{type}`.
pub fn default_type_namer(_template: &str, ty: &TypeHandle) -> String {
    format!("Test{}", ty.name())
}

/// The default naming scheme for object parameterised tests, `Test{object}`.
pub fn default_object_namer<O: fmt::Display>(_template: &str, object: &Arc<O>) -> String {
    format!("Test{object}")
}

/// An item to parameterise a test with, when the kind of the items is decided
/// by [TestGenerator::generate].
#[derive(Debug)]
pub enum TestWith<O> {
    Type(TypeHandle),
    Object(Arc<O>),
}

impl<O> TestWith<O> {
    /// Create a [TestWith::Type] for `T`.
    pub fn of_type<T: ?Sized + 'static>() -> Self {
        TestWith::Type(TypeHandle::of::<T>())
    }

    /// Create a [TestWith::Object] that owns the given object.
    pub fn object(object: O) -> Self {
        TestWith::Object(Arc::new(object))
    }

    pub fn kind(&self) -> TestKind {
        match self {
            TestWith::Type(_) => TestKind::Type,
            TestWith::Object(_) => TestKind::Object,
        }
    }

    fn into_type(self) -> Option<TypeHandle> {
        match self {
            TestWith::Type(ty) => Some(ty),
            TestWith::Object(_) => None,
        }
    }

    fn into_object(self) -> Option<Arc<O>> {
        match self {
            TestWith::Type(_) => None,
            TestWith::Object(object) => Some(object),
        }
    }
}

impl<O> Clone for TestWith<O> {
    fn clone(&self) -> Self {
        match self {
            TestWith::Type(ty) => TestWith::Type(*ty),
            TestWith::Object(object) => TestWith::Object(object.clone()),
        }
    }
}

impl<O> From<TypeHandle> for TestWith<O> {
    fn from(ty: TypeHandle) -> Self {
        TestWith::Type(ty)
    }
}

impl<O> From<Arc<O>> for TestWith<O> {
    fn from(object: Arc<O>) -> Self {
        TestWith::Object(object)
    }
}

impl<O: fmt::Display> fmt::Display for TestWith<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestWith::Type(ty) => write!(f, "{ty}"),
            TestWith::Object(object) => write!(f, "{object}"),
        }
    }
}

/// Either kind of template, for use with [TestGenerator::generate]. `O` is
/// the type of the objects, which is unused by type templates and defaults to
/// [String] for them.
#[derive(Debug)]
pub enum AnyTemplate<O: 'static = String> {
    Type(Arc<TypeTemplate>),
    Object(Arc<ObjectTemplate<O>>),
}

impl<O: 'static> AnyTemplate<O> {
    pub fn name(&self) -> &str {
        match self {
            AnyTemplate::Type(template) => template.name(),
            AnyTemplate::Object(template) => template.name(),
        }
    }

    /// The kind of item the template is parameterised by.
    pub fn kind(&self) -> TestKind {
        match self {
            AnyTemplate::Type(_) => TestKind::Type,
            AnyTemplate::Object(_) => TestKind::Object,
        }
    }
}

/// The output of [TestGenerator::generate].
#[derive(Debug)]
pub enum GeneratedCases<O: 'static> {
    Types(GeneratedTests<TypeCase>),
    Objects(GeneratedTests<ObjectCase<O>>),
}

impl<O: 'static> GeneratedCases<O> {
    pub fn kind(&self) -> TestKind {
        match self {
            GeneratedCases::Types(_) => TestKind::Type,
            GeneratedCases::Objects(_) => TestKind::Object,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            GeneratedCases::Types(tests) => tests.len(),
            GeneratedCases::Objects(tests) => tests.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The generated names, in generation order.
    pub fn names(&self) -> Vec<&str> {
        match self {
            GeneratedCases::Types(tests) => tests.keys().map(String::as_str).collect(),
            GeneratedCases::Objects(tests) => tests.keys().map(String::as_str).collect(),
        }
    }

    /// Erase the kind of the generated cases.
    pub fn into_cases(self) -> Vec<(String, Box<dyn TestCase>)> {
        match self {
            GeneratedCases::Types(tests) => tests
                .into_iter()
                .map(|(name, case)| (name, Box::new(case) as Box<dyn TestCase>))
                .collect(),
            GeneratedCases::Objects(tests) => tests
                .into_iter()
                .map(|(name, case)| (name, Box::new(case) as Box<dyn TestCase>))
                .collect(),
        }
    }
}

/// Generates test cases from templates.
#[derive(Debug, Clone, Default, Constructor)]
pub struct TestGenerator {
    settings: GeneratorSettings,
}

impl TestGenerator {
    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Create a case for each of the given types, named using
    /// [default_type_namer].
    pub fn using_types(
        &self,
        template: &Arc<TypeTemplate>,
        types: impl IntoIterator<Item = TypeHandle>,
    ) -> Result<GeneratedTests<TypeCase>, GeneratorError> {
        self.using_types_named(template, types, default_type_namer)
    }

    /// Create a case for each of the given types, where `namer` receives the
    /// name of the template and the type and produces the name of the case.
    pub fn using_types_named(
        &self,
        template: &Arc<TypeTemplate>,
        types: impl IntoIterator<Item = TypeHandle>,
        namer: impl Fn(&str, &TypeHandle) -> String,
    ) -> Result<GeneratedTests<TypeCase>, GeneratorError> {
        let mut tests = GeneratedTests::new();

        for ty in types {
            let name = namer(template.name(), &ty);
            let case = TypeCase::new(name.clone(), template.clone(), ty);
            self.insert(&mut tests, name, case)?;
        }

        Ok(tests)
    }

    /// Create a case for each of the given objects, named using
    /// [default_object_namer].
    pub fn using_objects<O: fmt::Display + 'static>(
        &self,
        template: &Arc<ObjectTemplate<O>>,
        objects: impl IntoIterator<Item = Arc<O>>,
    ) -> Result<GeneratedTests<ObjectCase<O>>, GeneratorError> {
        self.using_objects_named(template, objects, default_object_namer)
    }

    /// Create a case for each of the given objects, where `namer` receives the
    /// name of the template and the object and produces the name of the case.
    pub fn using_objects_named<O: 'static>(
        &self,
        template: &Arc<ObjectTemplate<O>>,
        objects: impl IntoIterator<Item = Arc<O>>,
        namer: impl Fn(&str, &Arc<O>) -> String,
    ) -> Result<GeneratedTests<ObjectCase<O>>, GeneratorError> {
        let mut tests = GeneratedTests::new();

        for object in objects {
            let name = namer(template.name(), &object);
            let case = ObjectCase::new(name.clone(), template.clone(), object);
            self.insert(&mut tests, name, case)?;
        }

        Ok(tests)
    }

    /// Create a case for each item, where the first item decides whether
    /// types or objects are being tested. Every case is named `Test{item}`.
    ///
    /// When only types are tested the object type `O` is a placeholder, a
    /// template annotated as `AnyTemplate` uses the default.
    pub fn generate<O: fmt::Display + 'static>(
        &self,
        template: &AnyTemplate<O>,
        items: impl IntoIterator<Item = TestWith<O>>,
    ) -> Result<GeneratedCases<O>, GeneratorError> {
        self.generate_named(template, items, |_, item| format!("Test{item}"))
    }

    /// Like [TestGenerator::generate], but named by the given `namer`.
    pub fn generate_named<O: 'static>(
        &self,
        template: &AnyTemplate<O>,
        items: impl IntoIterator<Item = TestWith<O>>,
        namer: impl Fn(&str, &TestWith<O>) -> String,
    ) -> Result<GeneratedCases<O>, GeneratorError> {
        let items = items.into_iter().collect_vec();
        let kind = items.first().ok_or(GeneratorError::EmptyInput)?.kind();

        if let Some((index, _)) = items.iter().find_position(|item| item.kind() != kind) {
            return Err(GeneratorError::UnrecognisedKind { index, expected: kind });
        }

        match (kind, template) {
            (TestKind::Type, AnyTemplate::Type(template)) => self
                .using_types_named(
                    template,
                    items.into_iter().filter_map(TestWith::into_type),
                    |name: &str, ty: &TypeHandle| namer(name, &TestWith::Type(*ty)),
                )
                .map(GeneratedCases::Types),
            (TestKind::Object, AnyTemplate::Object(template)) => self
                .using_objects_named(
                    template,
                    items.into_iter().filter_map(TestWith::into_object),
                    |name: &str, object: &Arc<O>| namer(name, &TestWith::Object(object.clone())),
                )
                .map(GeneratedCases::Objects),
            _ => Err(GeneratorError::TemplateMismatch { template: template.name().to_owned(), kind }),
        }
    }

    fn insert<C>(
        &self,
        tests: &mut GeneratedTests<C>,
        name: String,
        case: C,
    ) -> Result<(), GeneratorError> {
        match tests.entry(name) {
            Entry::Vacant(entry) => {
                debug!("generated test case `{}`", entry.key());
                entry.insert(case);
            }
            Entry::Occupied(mut entry) => match self.settings.collision_policy {
                NameCollisionPolicy::Reject => {
                    return Err(GeneratorError::NameCollision { name: entry.key().clone() });
                }
                NameCollisionPolicy::Overwrite => {
                    warn!("test case `{}` is overwritten by a later item", entry.key());
                    entry.insert(case);
                }
            },
        }

        Ok(())
    }
}

/// Create a test case for each of the given types, using the default
/// settings and namer.
pub fn generate_from_types(
    template: &Arc<TypeTemplate>,
    types: impl IntoIterator<Item = TypeHandle>,
) -> Result<GeneratedTests<TypeCase>, GeneratorError> {
    TestGenerator::default().using_types(template, types)
}

/// Create a test case for each of the given objects, using the default
/// settings and namer.
pub fn generate_from_objects<O: fmt::Display + 'static>(
    template: &Arc<ObjectTemplate<O>>,
    objects: impl IntoIterator<Item = Arc<O>>,
) -> Result<GeneratedTests<ObjectCase<O>>, GeneratorError> {
    TestGenerator::default().using_objects(template, objects)
}

/// Create a test case for each item, where the kind of the first item decides
/// whether types or objects are being tested. See [TestGenerator::generate].
pub fn generate<O: fmt::Display + 'static>(
    template: &AnyTemplate<O>,
    items: impl IntoIterator<Item = TestWith<O>>,
) -> Result<GeneratedCases<O>, GeneratorError> {
    TestGenerator::default().generate(template, items)
}
