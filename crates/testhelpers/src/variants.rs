//! Selection of which variants of an interface to test.
//!
//! A suite that covers several interchangeable implementations (e.g. every
//! historical version of a store) can be limited to the latest of them by
//! setting `TEST_LATEST_ONLY=1`. This keeps everyday runs fast, whilst a full
//! CI run still covers every variant.
use std::{borrow::Cow, env, fmt, hash::Hash};

use indexmap::IndexSet;
use log::{debug, warn};

/// The name of the environment variable that limits testing to the latest
/// variant.
pub const TEST_LATEST_ONLY_ENVIRONMENT_VARIABLE_NAME: &str = "TEST_LATEST_ONLY";

/// The value that [TEST_LATEST_ONLY_ENVIRONMENT_VARIABLE_NAME] must have for
/// only the latest variant to be tested. Any other value, including an empty
/// one, is treated as not set.
pub const TEST_LATEST_ONLY_ENVIRONMENT_VARIABLE_SET_VALUE: &str = "1";

/// A source of named signals, this is usually the process environment.
pub trait SignalReader {
    /// Read the value of the signal with the given name, if any.
    fn read(&self, name: &str) -> Option<String>;
}

/// Reads signals from the environment of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvReader;

impl SignalReader for EnvReader {
    fn read(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }
}

impl<F> SignalReader for F
where
    F: Fn(&str) -> Option<String>,
{
    fn read(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Configuration of the "latest only" signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSelection {
    signal_name: Cow<'static, str>,
    set_value: Cow<'static, str>,
}

impl Default for VariantSelection {
    fn default() -> Self {
        Self::new(
            TEST_LATEST_ONLY_ENVIRONMENT_VARIABLE_NAME,
            TEST_LATEST_ONLY_ENVIRONMENT_VARIABLE_SET_VALUE,
        )
    }
}

impl VariantSelection {
    pub fn new(
        signal_name: impl Into<Cow<'static, str>>,
        set_value: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self { signal_name: signal_name.into(), set_value: set_value.into() }
    }

    pub fn signal_name(&self) -> &str {
        &self.signal_name
    }

    pub fn set_value(&self) -> &str {
        &self.set_value
    }

    /// Whether testing is limited to the latest variant, i.e. the signal
    /// exactly equals the set value.
    pub fn is_latest_only<R: SignalReader + ?Sized>(&self, reader: &R) -> bool {
        let value = reader.read(&self.signal_name);
        let latest_only = value.as_deref() == Some(self.set_value.as_ref());

        debug!(
            "`{}` is {value:?}, testing {} variants",
            self.signal_name,
            if latest_only { "only the latest" } else { "all" }
        );

        latest_only
    }

    /// Get the variants to test. This is `{latest}` if the signal is set, and
    /// `all` otherwise.
    pub fn select<T, R>(&self, all: IndexSet<T>, latest: T, reader: &R) -> IndexSet<T>
    where
        T: Hash + Eq + fmt::Debug,
        R: SignalReader + ?Sized,
    {
        if !all.contains(&latest) {
            warn!("the latest variant {latest:?} is not one of the variants {all:?}");
        }

        if self.is_latest_only(reader) { IndexSet::from([latest]) } else { all }
    }

    /// Whether `candidate` should be tested, given which variant is the
    /// latest.
    pub fn should_test<T, R>(&self, candidate: &T, latest: &T, reader: &R) -> bool
    where
        T: PartialEq + ?Sized,
        R: SignalReader + ?Sized,
    {
        candidate == latest || !self.is_latest_only(reader)
    }
}

/// Get the variants of `all_classes` that are to be tested, where
/// `TEST_LATEST_ONLY=1` (as read by `reader`) limits testing to
/// `latest_class`.
pub fn get_classes_to_test<T, R>(
    all_classes: IndexSet<T>,
    latest_class: T,
    reader: &R,
) -> IndexSet<T>
where
    T: Hash + Eq + fmt::Debug,
    R: SignalReader + ?Sized,
{
    VariantSelection::default().select(all_classes, latest_class, reader)
}

/// Whether the current process is limited to testing the latest variant.
pub fn latest_only() -> bool {
    VariantSelection::default().is_latest_only(&EnvReader)
}
