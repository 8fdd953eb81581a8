// kicad-libman: KiCad Library Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::ManufacturerResolver;

#[test]
fn test_prefix_is_manufacturer() {
    let resolver = ManufacturerResolver::default();
    assert_eq!(resolver.resolve("TI_LM317.pdf"), "TI");
    assert_eq!(resolver.resolve("st_l7805_rev3.pdf"), "ST");
}

#[test]
fn test_no_delimiter_falls_back() {
    let resolver = ManufacturerResolver::default();
    assert_eq!(resolver.resolve("resistor.pdf"), "Misc");
    assert_eq!(resolver.fallback(), "Misc");
}

#[test]
fn test_degenerate_first_segment_falls_back() {
    let resolver = ManufacturerResolver::default();
    assert_eq!(resolver.resolve("_notes.pdf"), "Misc");
    assert_eq!(resolver.resolve(".._escape.pdf"), "Misc");
    assert_eq!(resolver.resolve("._hidden.pdf"), "Misc");
}

#[test]
fn test_custom_delimiter() {
    let resolver = ManufacturerResolver::new("-", "Unknown");
    assert_eq!(resolver.resolve("Microchip-PIC16F84.pdf"), "MICROCHIP");
    assert_eq!(resolver.resolve("TI_LM317.pdf"), "Unknown");
}

#[test]
fn test_grouping_table() {
    let resolver = ManufacturerResolver::default();
    let rows: Vec<_> = [
        "TI_LM317.pdf",
        "resistor.pdf",
        "nxp_lpc1768_um.pdf",
        "Würth_744.pdf",
    ]
    .iter()
    .map(|name| format!("{name} -> {}", resolver.resolve(name)))
    .collect();
    insta::assert_snapshot!(rows.join("\n"), @r"
TI_LM317.pdf -> TI
resistor.pdf -> Misc
nxp_lpc1768_um.pdf -> NXP
Würth_744.pdf -> WÜRTH
");
}
