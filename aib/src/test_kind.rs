// Copyright 2024 The Auto-Install Binaries Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Test-kind component suffixing: a pseudo-builder concern layered on top
//! of the tagging engine, so a unit test, benchmark or integration test
//! target gets routed into its own installable component automatically
//! instead of every caller repeating the convention by hand.

/// The three build-target kinds that get an automatic component suffix and
/// a set of extra components unioned into whatever the caller already
/// requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestKind {
    UnitTest,
    Benchmark,
    IntegrationTest,
}

impl TestKind {
    fn suffix(self) -> &'static str {
        match self {
            TestKind::UnitTest | TestKind::IntegrationTest => "-test",
            TestKind::Benchmark => "-benchmark",
        }
    }

    fn extra_components(self) -> &'static [&'static str] {
        match self {
            TestKind::UnitTest => &["tests", "unittests"],
            TestKind::Benchmark => &["tests", "benchmarks"],
            TestKind::IntegrationTest => &["tests", "integration-tests"],
        }
    }

    /// Appends this kind's suffix to `component`, unless it's already
    /// present (so registering the same target twice is idempotent).
    pub fn component_tag(self, component: &str) -> String {
        if component.ends_with(self.suffix()) {
            component.to_owned()
        } else {
            format!("{component}{}", self.suffix())
        }
    }

    /// Unions this kind's extra components into `additional_components`,
    /// deduplicating.
    pub fn additional_components<'a>(self, additional: &[&'a str]) -> Vec<String> {
        let mut out: Vec<String> = additional.iter().map(|s| s.to_string()).collect();
        for extra in self.extra_components() {
            if !out.iter().any(|c| c == extra) {
                out.push((*extra).to_owned());
            }
        }
        out
    }
}
