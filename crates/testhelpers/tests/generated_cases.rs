//! Runs templates through the generator against a few interchangeable
//! implementations, the way a test suite would.
use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use indexmap::IndexSet;
use pretty_assertions::assert_eq;
use testhelpers::{
    generate, generate_from_objects, generate_from_types, get_classes_to_test,
    logging::{self, LevelFilter},
    AnyTemplate, GeneratedCases, GeneratorError, ObjectTemplate, TestCase, TestFailure,
    TestUsing, TestUsingObject, TestUsingType, TestWith, TypeHandle, TypeTemplate,
};

trait Counter {
    fn increment(&mut self);
    fn value(&self) -> u32;
}

#[derive(Default)]
struct TallyCounter {
    tally: Vec<()>,
}

impl Counter for TallyCounter {
    fn increment(&mut self) {
        self.tally.push(());
    }

    fn value(&self) -> u32 {
        self.tally.len() as u32
    }
}

#[derive(Default)]
struct FastCounter {
    count: u32,
}

impl Counter for FastCounter {
    fn increment(&mut self) {
        self.count += 1;
    }

    fn value(&self) -> u32 {
        self.count
    }
}

/// A counter that forgets every other increment.
#[derive(Default)]
struct LossyCounter {
    count: u32,
    calls: u32,
}

impl Counter for LossyCounter {
    fn increment(&mut self) {
        self.calls += 1;
        if self.calls % 2 == 1 {
            self.count += 1;
        }
    }

    fn value(&self) -> u32 {
        self.count
    }
}

fn make_counter(ty: TypeHandle) -> Result<Box<dyn Counter>, TestFailure> {
    if ty.is::<TallyCounter>() {
        Ok(Box::<TallyCounter>::default())
    } else if ty.is::<FastCounter>() {
        Ok(Box::<FastCounter>::default())
    } else if ty.is::<LossyCounter>() {
        Ok(Box::<LossyCounter>::default())
    } else {
        Err(TestFailure::new(format!("`{ty}` is not a counter")))
    }
}

fn counter_template() -> Arc<TypeTemplate> {
    let template = TypeTemplate::new("CounterTests")
        .with_test("starts_at_zero", |case| {
            let counter = make_counter(case.type_to_test())?;
            TestFailure::check(counter.value() == 0, "counter did not start at zero")
        })
        .with_test("counts_every_increment", |case| {
            let mut counter = make_counter(case.type_to_test())?;
            (0..4).for_each(|_| counter.increment());
            TestFailure::check(counter.value() == 4, format!("counted {}", counter.value()))
        });

    Arc::new(template)
}

#[test]
fn every_counter_gets_its_own_case() {
    logging::init(LevelFilter::Debug);

    let types = [
        TypeHandle::of::<TallyCounter>(),
        TypeHandle::of::<FastCounter>(),
        TypeHandle::of::<LossyCounter>(),
    ];
    let tests = generate_from_types(&counter_template(), types).unwrap();

    assert_eq!(
        tests.keys().map(String::as_str).collect::<Vec<_>>(),
        ["TestTallyCounter", "TestFastCounter", "TestLossyCounter"]
    );

    let bound: HashSet<_> = tests.values().map(TestUsingType::type_to_test).collect();
    assert_eq!(bound, HashSet::from(types));

    assert!(tests["TestTallyCounter"].run().is_ok());
    assert!(tests["TestFastCounter"].run().is_ok());

    let failure = tests["TestLossyCounter"].run().unwrap_err();
    assert_eq!(failure.case, "TestLossyCounter");
    assert_eq!(
        failure.failures,
        [("counts_every_increment".to_owned(), TestFailure::new("counted 2"))]
    );
}

#[test]
fn only_the_latest_counter_is_generated_when_limited() {
    let all = IndexSet::from([TypeHandle::of::<TallyCounter>(), TypeHandle::of::<FastCounter>()]);
    let latest = TypeHandle::of::<FastCounter>();

    let limited = get_classes_to_test(all.clone(), latest, &|_: &str| Some("1".to_owned()));
    let tests = generate_from_types(&counter_template(), limited).unwrap();
    assert_eq!(tests.keys().map(String::as_str).collect::<Vec<_>>(), ["TestFastCounter"]);

    let everything = get_classes_to_test(all, latest, &|_: &str| Some("0".to_owned()));
    let tests = generate_from_types(&counter_template(), everything).unwrap();
    assert_eq!(tests.len(), 2);
}

#[test]
fn object_cases_see_the_exact_object() {
    let seen = Arc::new(Mutex::new(vec![]));
    let recorder = seen.clone();

    let template = Arc::new(ObjectTemplate::<String>::new("Words").with_test(
        "records",
        move |case| {
            recorder.lock().unwrap().push(case.object_to_test().clone());
            Ok(())
        },
    ));

    let objects = [Arc::new("alpha".to_owned()), Arc::new("beta".to_owned())];
    let tests = generate_from_objects(&template, objects.clone()).unwrap();

    for case in tests.values() {
        case.run().unwrap();
    }

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    for (seen, object) in seen.iter().zip(&objects) {
        assert!(Arc::ptr_eq(seen, object));
    }
}

#[test]
fn generate_picks_the_kind_from_the_first_item() {
    let template: AnyTemplate = AnyTemplate::Type(counter_template());
    let cases = generate(&template, [TestWith::of_type::<FastCounter>()]).unwrap();

    let GeneratedCases::Types(tests) = cases else {
        panic!("expected type test cases");
    };
    assert_eq!(tests["TestFastCounter"].name(), "TestFastCounter");

    let items: Vec<TestWith<String>> = vec![];
    assert_eq!(generate(&template, items).unwrap_err(), GeneratorError::EmptyInput);
}

#[test]
fn erased_cases_can_be_run_together() {
    let template: AnyTemplate = AnyTemplate::Type(counter_template());
    let items = [TestWith::of_type::<TallyCounter>(), TestWith::of_type::<LossyCounter>()];

    let failed: Vec<String> = generate(&template, items)
        .unwrap()
        .into_cases()
        .into_iter()
        .filter(|(_, case)| case.run().is_err())
        .map(|(name, _)| name)
        .collect();

    assert_eq!(failed, ["TestLossyCounter"]);
}
