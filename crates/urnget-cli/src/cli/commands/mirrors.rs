//! Mirrors command: show the normalized mirror list.

use urnget_core::mirrors::MirrorSet;

/// Print each normalized mirror prefix, one per line.
pub fn run_mirrors(mirrors: &MirrorSet) {
    if mirrors.is_empty() {
        println!("no mirrors configured");
        return;
    }
    for prefix in mirrors.prefixes() {
        println!("{prefix}");
    }
}
