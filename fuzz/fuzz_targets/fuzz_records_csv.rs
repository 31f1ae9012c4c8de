#![no_main]

use ash_canopy_sim::io;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = io::read_records_csv_from_bytes(data);
    let _ = io::read_records_json_from_bytes(data);
});
