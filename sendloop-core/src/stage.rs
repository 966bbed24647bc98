//! Mapping from completion percentage to a discrete visual stage.
//!
//! Each visual type partitions 0..=100 into its own fixed bands; boundary
//! values belong to the lower band. The band counts differ on purpose
//! (richer visuals get more stages) — do not unify them.

use serde::Serialize;

use crate::models::VisualType;

/// One bucket of a visual type's ordered stage list.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Stage {
    pub index: usize,
    pub name: &'static str,
}

/// Total over all inputs: the percentage is clamped into 0..=100 first,
/// so out-of-range values select the nearest band instead of failing.
pub fn stage_for(visual_type: VisualType, percentage: i64) -> Stage {
    let pct = percentage.clamp(0, 100);
    match visual_type {
        VisualType::Tree => tree_stage(pct),
        VisualType::Garden => garden_stage(pct),
        VisualType::Pet => pet_stage(pct),
        VisualType::ProgressBar => Stage {
            index: 0,
            name: "Progress bar",
        },
    }
}

fn tree_stage(pct: i64) -> Stage {
    if pct <= 10 {
        Stage { index: 0, name: "Seed" }
    } else if pct <= 30 {
        Stage { index: 1, name: "Sprout" }
    } else if pct <= 60 {
        Stage { index: 2, name: "Young tree" }
    } else if pct <= 90 {
        Stage { index: 3, name: "Mature tree" }
    } else {
        Stage { index: 4, name: "Blooming tree" }
    }
}

fn garden_stage(pct: i64) -> Stage {
    if pct <= 30 {
        Stage { index: 0, name: "Soil" }
    } else if pct <= 70 {
        Stage { index: 1, name: "Single flower" }
    } else {
        Stage { index: 2, name: "Full garden" }
    }
}

fn pet_stage(pct: i64) -> Stage {
    if pct <= 30 {
        Stage { index: 0, name: "Egg" }
    } else if pct <= 70 {
        Stage { index: 1, name: "Hatching" }
    } else {
        Stage { index: 2, name: "Adult pet" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_band_boundaries_are_inclusive_below() {
        let cases = [
            (0, "Seed"),
            (10, "Seed"),
            (11, "Sprout"),
            (30, "Sprout"),
            (31, "Young tree"),
            (60, "Young tree"),
            (61, "Mature tree"),
            (90, "Mature tree"),
            (91, "Blooming tree"),
            (100, "Blooming tree"),
        ];
        for (pct, name) in cases {
            assert_eq!(stage_for(VisualType::Tree, pct).name, name, "at {pct}%");
        }
    }

    #[test]
    fn garden_band_boundaries() {
        assert_eq!(stage_for(VisualType::Garden, 30).name, "Soil");
        assert_eq!(stage_for(VisualType::Garden, 31).name, "Single flower");
        assert_eq!(stage_for(VisualType::Garden, 70).name, "Single flower");
        assert_eq!(stage_for(VisualType::Garden, 71).name, "Full garden");
    }

    #[test]
    fn pet_band_boundaries() {
        assert_eq!(stage_for(VisualType::Pet, 30).name, "Egg");
        assert_eq!(stage_for(VisualType::Pet, 31).name, "Hatching");
        assert_eq!(stage_for(VisualType::Pet, 70).name, "Hatching");
        assert_eq!(stage_for(VisualType::Pet, 71).name, "Adult pet");
    }

    #[test]
    fn progress_bar_has_a_single_stage() {
        for pct in [0, 50, 100] {
            assert_eq!(stage_for(VisualType::ProgressBar, pct).index, 0);
        }
    }

    #[test]
    fn out_of_range_percentages_clamp() {
        assert_eq!(stage_for(VisualType::Tree, -20).name, "Seed");
        assert_eq!(stage_for(VisualType::Tree, 250).name, "Blooming tree");
    }

    #[test]
    fn stage_indexes_are_ordered_within_a_type() {
        let mut last = 0;
        for pct in 0..=100 {
            let stage = stage_for(VisualType::Tree, pct);
            assert!(stage.index >= last);
            last = stage.index;
        }
        assert_eq!(last, 4);
    }
}
