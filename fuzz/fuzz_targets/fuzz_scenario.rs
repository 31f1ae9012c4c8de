#![no_main]

use ash_canopy_sim::{io, simulate, Policy};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    for parsed in [io::parse_scenario_toml(text), io::parse_scenario_json(text)] {
        if let Ok(mut scenario) = parsed {
            // keep runs short; a validated site must never fail to simulate
            scenario.site.horizon_years = scenario.site.horizon_years.min(50);
            let policy = Policy::InjectRemoveReplant {
                injection_years: scenario.params.injection_years,
                removal_rate: scenario.params.removal_rate,
            };
            if scenario.site.validate().is_ok() {
                assert!(simulate(&scenario.site, &policy).is_ok());
            }
        }
    }
});
