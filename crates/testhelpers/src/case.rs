//! Generated test cases. A generated case is a [Template] that has been
//! permanently bound to a single item, and exposes that item through the
//! matching capability trait.
use std::{fmt, sync::Arc};

use log::debug;

use crate::{
    error::{CaseFailure, TestFailure},
    template::{
        ObjectTemplate, Template, TestUsing, TestUsingObject, TestUsingType, TypeHandle,
        TypeTemplate,
    },
};

/// A generated test case that can be run by a test harness.
pub trait TestCase: TestUsing {
    /// Run every test of the template against the bound item, collecting all
    /// of the failures rather than stopping at the first one.
    fn run(&self) -> Result<(), CaseFailure>;
}

/// A [TypeTemplate] bound to a single type.
#[derive(Debug, Clone)]
pub struct TypeCase {
    name: String,
    template: Arc<TypeTemplate>,
    ty: TypeHandle,
}

impl TypeCase {
    pub(crate) fn new(name: String, template: Arc<TypeTemplate>, ty: TypeHandle) -> Self {
        Self { name, template, ty }
    }

    pub fn template(&self) -> &Arc<TypeTemplate> {
        &self.template
    }
}

impl TestUsing for TypeCase {
    fn name(&self) -> &str {
        &self.name
    }
}

impl TestUsingType for TypeCase {
    fn type_to_test(&self) -> TypeHandle {
        self.ty
    }
}

impl TestCase for TypeCase {
    fn run(&self) -> Result<(), CaseFailure> {
        let case: &dyn TestUsingType = self;
        run_template(&self.name, &*self.template, case)
    }
}

/// An [ObjectTemplate] bound to a single object.
pub struct ObjectCase<O: 'static> {
    name: String,
    template: Arc<ObjectTemplate<O>>,
    object: Arc<O>,
}

impl<O: 'static> ObjectCase<O> {
    pub(crate) fn new(name: String, template: Arc<ObjectTemplate<O>>, object: Arc<O>) -> Self {
        Self { name, template, object }
    }

    pub fn template(&self) -> &Arc<ObjectTemplate<O>> {
        &self.template
    }
}

impl<O: 'static> Clone for ObjectCase<O> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            template: self.template.clone(),
            object: self.object.clone(),
        }
    }
}

impl<O: fmt::Debug + 'static> fmt::Debug for ObjectCase<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectCase")
            .field("name", &self.name)
            .field("template", &self.template)
            .field("object", &self.object)
            .finish()
    }
}

impl<O: 'static> TestUsing for ObjectCase<O> {
    fn name(&self) -> &str {
        &self.name
    }
}

impl<O: 'static> TestUsingObject for ObjectCase<O> {
    type Object = O;

    fn object_to_test(&self) -> &Arc<O> {
        &self.object
    }
}

impl<O: 'static> TestCase for ObjectCase<O> {
    fn run(&self) -> Result<(), CaseFailure> {
        let case: &dyn TestUsingObject<Object = O> = self;
        run_template(&self.name, &*self.template, case)
    }
}

fn run_template<C: ?Sized>(
    case_name: &str,
    template: &Template<C>,
    case: &C,
) -> Result<(), CaseFailure> {
    let failures: Vec<(String, TestFailure)> = template
        .tests()
        .filter_map(|test| {
            debug!("running `{}` of `{case_name}`", test.name());
            test.run(case).err().map(|failure| (test.name().to_owned(), failure))
        })
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(CaseFailure { case: case_name.to_owned(), total: template.len(), failures })
    }
}
