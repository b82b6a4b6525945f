//! The fixed battery of range-of-motion tests.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryTest {
    pub name: &'static str,
    /// Expected full range in degrees; `None` when the test has no such baseline.
    pub full_rom: Option<f64>,
}

pub const BATTERY: [BatteryTest; 12] = [
    BatteryTest {
        name: "Shoulder IR",
        full_rom: Some(90.0),
    },
    BatteryTest {
        name: "Shoulder ER",
        full_rom: Some(90.0),
    },
    BatteryTest {
        name: "Shoulder Abduction",
        full_rom: Some(45.0),
    },
    BatteryTest {
        name: "Shoulder Flexion",
        full_rom: Some(140.0),
    },
    BatteryTest {
        name: "Trunk Rotation",
        full_rom: Some(70.0),
    },
    BatteryTest {
        name: "Ober's (Hip Adduction)",
        full_rom: Some(45.0),
    },
    BatteryTest {
        name: "Hip Abduction",
        full_rom: Some(45.0),
    },
    BatteryTest {
        name: "Hip Flexion",
        full_rom: Some(90.0),
    },
    BatteryTest {
        name: "Straight Leg Raise",
        full_rom: Some(90.0),
    },
    BatteryTest {
        name: "Hip IR",
        full_rom: Some(40.0),
    },
    BatteryTest {
        name: "Hip ER",
        full_rom: Some(45.0),
    },
    BatteryTest {
        name: "Foot Presentation",
        full_rom: None,
    },
];

pub fn all() -> &'static [BatteryTest] {
    &BATTERY
}

pub fn find(name: &str) -> Option<&'static BatteryTest> {
    let name = name.trim();
    BATTERY.iter().find(|t| t.name.eq_ignore_ascii_case(name))
}

/// Battery order index, used to sort a session's rows.
pub fn position(name: &str) -> Option<usize> {
    BATTERY.iter().position(|t| t.name.eq_ignore_ascii_case(name.trim()))
}
