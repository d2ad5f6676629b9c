//! Settings that can be applied to the test generator.

/// What the generator does when two items are given the same test name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameCollisionPolicy {
    /// Fail with [`GeneratorError::NameCollision`](crate::error::GeneratorError).
    #[default]
    Reject,
    /// Keep the case of the last item with the name, at the position of the
    /// first. A warning is logged for each overwritten case.
    Overwrite,
}

/// Various settings that control how test cases are generated.
#[derive(Debug, Clone, Default)]
pub struct GeneratorSettings {
    /// How test name collisions are handled.
    pub collision_policy: NameCollisionPolicy,
}

impl GeneratorSettings {
    /// Create a new [GeneratorSettings] with the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the [NameCollisionPolicy] of the generator.
    pub fn set_collision_policy(&mut self, policy: NameCollisionPolicy) -> &mut Self {
        self.collision_policy = policy;
        self
    }
}
