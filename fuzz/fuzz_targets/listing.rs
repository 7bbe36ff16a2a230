#![no_main]

use disforge_disasm::{Line, Listing, ListingConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let listing = Listing::with_config(data, ListingConfig::default().with_origin(0x1000));

    assert!(listing.consumed <= data.len());
    if !listing.truncated {
        assert_eq!(listing.consumed, data.len());
    }
    for pair in listing.lines.windows(2) {
        assert!(pair[0].offset() < pair[1].offset());
        assert!(!matches!(pair[0], Line::Truncated { .. }));
    }

    // Rendering must not panic either
    let _ = listing.to_string();
});
