/// One progress sink threaded through composed codec stages.
///
/// Each stage owns a sub-range of 0..=100 and scales its own fraction into
/// that range before forwarding, so the combined callback sequence stays
/// monotonically non-decreasing across a whole pipeline. Reports are
/// throttled to whole-percent changes; the sink only ever sees values in
/// 0..=100 and never sees one smaller than the last.
pub struct Progress<'a> {
    sink: Option<&'a mut dyn FnMut(u8)>,
    base: f32,
    span: f32,
    last: i16,
}

impl<'a> Progress<'a> {
    /// A progress handle that reports nowhere.
    pub fn none() -> Self {
        Self {
            sink: None,
            base: 0.0,
            span: 100.0,
            last: -1,
        }
    }

    /// Wrap a caller-supplied sink covering the full 0..=100 range.
    pub fn new(sink: &'a mut dyn FnMut(u8)) -> Self {
        Self {
            sink: Some(sink),
            base: 0.0,
            span: 100.0,
            last: -1,
        }
    }

    /// A sub-handle owning `span` percent of this handle's range starting
    /// at `base` percent of it. Stages report 0..=100 locally and the
    /// nesting does the arithmetic.
    pub fn stage(&mut self, base: f32, span: f32) -> Progress<'_> {
        Progress {
            // Reborrow through a fresh trait object so the sub-handle's
            // lifetime is the reborrow, not 'a.
            sink: self.sink.as_deref_mut().map(|f| f as &mut dyn FnMut(u8)),
            base: self.base + base / 100.0 * self.span,
            span: span / 100.0 * self.span,
            last: self.last,
        }
    }

    /// Report `done` of `total` units complete within this handle's range.
    pub fn report(&mut self, done: usize, total: usize) {
        if total == 0 {
            return;
        }
        let frac = (done as f32 / total as f32).clamp(0.0, 1.0);
        self.emit(self.base + frac * self.span);
    }

    /// Report this handle's range fully complete.
    pub fn finish(&mut self) {
        self.emit(self.base + self.span);
    }

    fn emit(&mut self, percent: f32) {
        let percent = percent.round().clamp(0.0, 100.0) as i16;
        if percent > self.last {
            self.last = percent;
            if let Some(sink) = self.sink.as_deref_mut() {
                sink(percent as u8);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::Progress;

    #[test]
    fn reports_are_monotonic_and_bounded_test() {
        let mut seen: Vec<u8> = Vec::new();
        let mut sink = |pct: u8| seen.push(pct);
        let mut progress = Progress::new(&mut sink);
        for done in [0_usize, 3, 3, 2, 7, 10] {
            progress.report(done, 10);
        }
        progress.finish();
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(*seen.last().unwrap(), 100);
    }

    #[test]
    fn stages_scale_into_sub_ranges_test() {
        let mut seen: Vec<u8> = Vec::new();
        let mut sink = |pct: u8| seen.push(pct);
        let mut progress = Progress::new(&mut sink);
        {
            let mut first = progress.stage(0.0, 50.0);
            first.report(1, 2);
            first.finish();
        }
        {
            let mut second = progress.stage(50.0, 50.0);
            second.report(1, 2);
            second.finish();
        }
        assert_eq!(seen, vec![25, 50, 75, 100]);
    }

    #[test]
    fn nested_stages_compose_test() {
        let mut seen: Vec<u8> = Vec::new();
        let mut sink = |pct: u8| seen.push(pct);
        let mut progress = Progress::new(&mut sink);
        let mut outer = progress.stage(0.0, 60.0);
        let mut inner = outer.stage(50.0, 50.0);
        inner.finish();
        assert_eq!(seen, vec![60]);
    }

    #[test]
    fn none_progress_is_silent_test() {
        let mut progress = Progress::none();
        progress.report(5, 10);
        progress.finish();
    }
}
