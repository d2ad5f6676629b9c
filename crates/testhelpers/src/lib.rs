//! Helpers for creating parameterised tests.
//!
//! A [Template](template::Template) is written once against one of the
//! capability traits, and then the [generator] binds it to a collection of
//! types or objects, creating a uniquely named test case for each of them.
//! When the items are known at compile time, [create_tests_using_types!] and
//! [create_tests_using_objects!] generate a `#[test]` function for each item
//! instead.
//!
//! The [variants] module decides whether all variants of an interface are
//! tested, or only the latest one when `TEST_LATEST_ONLY=1`.
pub mod case;
pub mod error;
pub mod generator;
pub mod logging;
pub mod settings;
pub mod template;
pub mod variants;

pub use case::{ObjectCase, TestCase, TypeCase};
pub use error::{CaseFailure, GeneratorError, TestFailure, TestResult};
pub use generator::{
    generate, generate_from_objects, generate_from_types, AnyTemplate, GeneratedCases,
    GeneratedTests, TestGenerator, TestWith,
};
pub use settings::{GeneratorSettings, NameCollisionPolicy};
pub use template::{
    ObjectTemplate, Template, TestKind, TestUsing, TestUsingObject, TestUsingType, TypeHandle,
    TypeTemplate,
};
pub use testhelpers_macros::{create_tests_using_objects, create_tests_using_types};
pub use variants::{get_classes_to_test, EnvReader, SignalReader, VariantSelection};
