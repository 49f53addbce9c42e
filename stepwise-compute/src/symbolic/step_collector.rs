/// A type that collects the steps of an algorithm.
///
/// [`StepCollector`] is also implemented for the unit type `()`. This is useful when you don't
/// want to know the steps taken by an algorithm; the algorithm then skips building the wrapper
/// steps that group the steps of a sub-derivation.
pub trait StepCollector<S> {
    /// Adds a step to the collector.
    fn push(&mut self, step: S);

    /// Returns true if pushed steps are kept.
    fn is_recording(&self) -> bool;
}

impl<S> StepCollector<S> for () {
    #[inline]
    fn push(&mut self, _: S) {}

    #[inline]
    fn is_recording(&self) -> bool {
        false
    }
}

impl<S> StepCollector<S> for Vec<S> {
    #[inline]
    fn push(&mut self, step: S) {
        Vec::push(self, step);
    }

    #[inline]
    fn is_recording(&self) -> bool {
        true
    }
}
