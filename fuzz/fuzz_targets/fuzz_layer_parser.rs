#![no_main]

use arc_harmonizer::{harmonize_arc_centers, parse_layer, write_layer, HarmonizeOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(mut layer) = parse_layer(text) else {
        return;
    };

    let selection = layer.feature_ids();
    harmonize_arc_centers(&mut layer, &selection, &HarmonizeOptions::with_tolerance(0.05));
    let _ = write_layer(&layer);
});
