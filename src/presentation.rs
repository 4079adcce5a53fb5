//! Presentation mapping for the domain enums
//!
//! One table per enum, consumed by everything that decorates output (the
//! rich-text export badges, the PDF theme, API clients asking for icon
//! hints), instead of each surface carrying its own copy.

use crate::models::{EnforcementAction, InspectionStatus};

/// Visual identity of a lifecycle state: icon slug plus badge colors
/// (background / foreground, CSS hex).
#[derive(Debug, Clone, Copy)]
pub struct StatusPresentation {
    pub icon: &'static str,
    pub background: &'static str,
    pub foreground: &'static str,
}

pub fn status_presentation(status: InspectionStatus) -> StatusPresentation {
    match status {
        InspectionStatus::Open => StatusPresentation {
            icon: "file",
            background: "#dbeafe",
            foreground: "#1e40af",
        },
        InspectionStatus::UnderReview => StatusPresentation {
            icon: "eye",
            background: "#f3e8ff",
            foreground: "#6b21a8",
        },
        InspectionStatus::InProgress => StatusPresentation {
            icon: "clock",
            background: "#fef9c3",
            foreground: "#854d0e",
        },
        InspectionStatus::PendingFollowUp => StatusPresentation {
            icon: "arrow-path",
            background: "#ffedd5",
            foreground: "#9a3412",
        },
        InspectionStatus::Closed => StatusPresentation {
            icon: "check-circle",
            background: "#dcfce7",
            foreground: "#166534",
        },
    }
}

pub fn action_icon(action: EnforcementAction) -> &'static str {
    match action {
        EnforcementAction::Oriented => "chat-bubble-left-right",
        EnforcementAction::Notification => "document-text",
        EnforcementAction::Fine => "receipt-percent",
        EnforcementAction::Seizure => "archive-box-arrow-down",
        EnforcementAction::Embargo => "no-symbol",
        EnforcementAction::Interdiction => "lock-closed",
        EnforcementAction::Demolition => "building-slash",
    }
}

/// Header fill of tabular reports (institutional blue).
pub const TABLE_HEADER_FILL: (u8, u8, u8) = (13, 71, 161);
