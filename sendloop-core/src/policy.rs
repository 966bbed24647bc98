//! Access policy: the pure mapping from a subscription tier to feature
//! limits. The tier value is always passed in explicitly — there is no
//! ambient subscription state anywhere in the core.

use crate::models::{Tier, TierLimits, VisualType};

pub fn limits(tier: Tier) -> TierLimits {
    match tier {
        Tier::Pro => TierLimits {
            // Practical cap; the product sells this as "unlimited".
            max_active_tasks: 8,
            visual_types: 4,
            notification_customization: true,
            cloud_backup: true,
            csv_export: true,
            continue_tokens_per_cycle: 3,
        },
        Tier::Free => TierLimits {
            max_active_tasks: 1,
            visual_types: 1,
            notification_customization: false,
            cloud_backup: false,
            csv_export: false,
            continue_tokens_per_cycle: 1,
        },
    }
}

pub fn can_create_task(tier: Tier, current_active_count: usize) -> bool {
    current_active_count < limits(tier).max_active_tasks
}

/// Visual types available on a tier: the first N by numeric encoding.
pub fn unlocked_visual_types(tier: Tier) -> &'static [VisualType] {
    let count = limits(tier).visual_types.min(VisualType::ALL.len());
    &VisualType::ALL[..count]
}
