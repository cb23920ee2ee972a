use anyhow::Result;

use sectionlock_core::NavPreset;

pub async fn run() -> Result<()> {
    println!("Navigation presets:\n");

    for preset in NavPreset::ALL {
        let navigation = preset.navigation();
        let wheel = preset.wheel();
        let touch = preset.touch();

        println!("  {}", preset);
        println!(
            "    transition: {}ms {:?}",
            navigation.transition_duration_ms, navigation.easing
        );
        println!(
            "    wheel:      threshold {}, min delta {}, gesture gap {}ms",
            wheel.threshold, wheel.min_event_delta, wheel.gesture_gap_ms
        );
        println!(
            "    touch:      min distance {}, max duration {}ms",
            touch.min_distance, touch.max_duration_ms
        );
        println!();
    }

    println!("Select one with --preset <name> or `preset = \"<name>\"` under [general].");

    Ok(())
}
