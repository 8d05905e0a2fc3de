//! # Built-in Example Structures
//!
//! A small catalog of ready-made payloads: the classic symmetric two-span
//! beam every textbook opens with, and the two-bay portal frame used as the
//! hand method's worked example. Front ends use these for demos and smoke
//! checks; the test suite leans on them as known-good fixtures.

use once_cell::sync::Lazy;

use crate::input::RawStructureInput;

/// A named, ready-to-solve example payload.
#[derive(Debug, Clone)]
pub struct Preset {
    /// Short name used to select the preset
    pub name: &'static str,

    /// One-line description for listings
    pub description: &'static str,

    /// The payload itself
    pub input: RawStructureInput,
}

static PRESETS: Lazy<Vec<Preset>> = Lazy::new(|| vec![two_span_beam(), portal_frame()]);

/// All built-in presets.
pub fn all() -> &'static [Preset] {
    &PRESETS
}

/// Look up a preset by name.
pub fn by_name(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|preset| preset.name == name)
}

/// Symmetric two-span beam A-B-C with fixed-end moments of +/-26.25 on span
/// AB, half distribution and half carry-over at every member end.
///
/// Demonstrates reported non-convergence: the released ends keep a constant
/// balance-to-total ratio, so the error metric plateaus and the solve runs
/// its full pass allowance while joint B settles into equilibrium regardless.
fn two_span_beam() -> Preset {
    let mut input = RawStructureInput::blank(3);
    input.connect(0, 1);
    input.connect(1, 2);
    input.set_distribution_factor(1, 0, 0.5);
    input.set_distribution_factor(0, 1, 0.5);
    input.set_distribution_factor(2, 1, 0.5);
    input.set_distribution_factor(1, 2, 0.5);
    for (i, j) in [(0, 1), (1, 0), (1, 2), (2, 1)] {
        input.set_carry_over_factor(i, j, 0.5);
    }
    input.set_initial_moment(1, 0, 26.25);
    input.set_initial_moment(0, 1, -26.25);
    input.max_iterations = 20;
    input.min_error_percent = 0.001;

    Preset {
        name: "two-span-beam",
        description: "Symmetric two-span continuous beam, loaded on span AB",
        input,
    }
}

/// Two-bay portal frame, six joints A..F: columns fixed at A and D, beams
/// BE and CF, fixed-end moments on AB and BE. Converges in 15 passes at the
/// default tolerance.
fn portal_frame() -> Preset {
    let mut input = RawStructureInput::blank(6);
    for (a, b) in [(0, 1), (1, 2), (1, 3), (1, 4), (2, 3), (2, 5), (4, 5)] {
        input.connect(a, b);
    }
    for (i, j, v) in [
        (0, 1, 0.364),
        (1, 2, 0.273),
        (1, 4, 0.571),
        (2, 1, 0.273),
        (2, 5, 0.571),
        (3, 1, 0.364),
        (3, 2, 0.364),
        (4, 5, 0.429),
        (5, 2, 0.364),
        (5, 4, 0.429),
    ] {
        input.set_distribution_factor(i, j, v);
    }
    for (i, j) in [
        (0, 1),
        (1, 2),
        (1, 4),
        (2, 1),
        (2, 5),
        (3, 2),
        (4, 1),
        (4, 5),
        (5, 2),
        (5, 4),
    ] {
        input.set_carry_over_factor(i, j, 0.5);
    }
    input.set_initial_moment(0, 1, 26.25);
    input.set_initial_moment(1, 0, -26.25);
    input.set_initial_moment(1, 4, 18.75);
    input.set_initial_moment(4, 1, -18.75);
    input.max_iterations = 50;
    input.min_error_percent = 0.001;

    Preset {
        name: "portal-frame",
        description: "Two-bay portal frame, six joints, fixed column bases",
        input,
    }
}
