//! Lifecycle rules and audit-history synthesis
//!
//! Every rule that decides how a case moves between states or what lands in
//! its audit trail lives here as a pure function over the record, so the
//! policy is testable without any store behind it. Stores call these
//! functions and persist whatever they return.

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{
    EnforcementAction, HistoryEntry, Inspection, InspectionStatus, UpdateInspection,
};

/// Initial status rule: intake with a pre-assigned inspector goes straight
/// to review, otherwise the case opens untriaged.
pub fn initial_status(inspector: Option<&str>) -> InspectionStatus {
    match inspector {
        Some(name) if !name.trim().is_empty() => InspectionStatus::UnderReview,
        _ => InspectionStatus::Open,
    }
}

/// Seed entry for a freshly created case.
pub fn creation_entry(
    inspector: Option<&str>,
    user: &str,
    now: DateTime<Utc>,
) -> HistoryEntry {
    let change = match inspector {
        Some(name) if !name.trim().is_empty() => {
            format!("Chamado criado e atribuído para {}.", name)
        }
        _ => "Chamado criado.".to_string(),
    };
    HistoryEntry {
        timestamp: now,
        user: user.to_string(),
        change,
    }
}

/// Order-independent equality over the enforcement-action set.
pub fn actions_equal(a: &[EnforcementAction], b: &[EnforcementAction]) -> bool {
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort();
    b.sort();
    a == b
}

/// Diff the tracked fields of an edit against the current record and
/// synthesize the audit entries the edit produces. All entries share the
/// one `now` timestamp.
///
/// Tracked fields: status, inspector, report, actions (compared as sets),
/// verified infractions (compared as whole maps). Untracked fields merge
/// silently.
pub fn plan_update(
    current: &Inspection,
    changes: &UpdateInspection,
    user: &str,
    now: DateTime<Utc>,
) -> Vec<HistoryEntry> {
    let mut entries = Vec::new();
    let mut push = |change: String| {
        entries.push(HistoryEntry {
            timestamp: now,
            user: user.to_string(),
            change,
        });
    };

    if let Some(status) = changes.status {
        if status != current.status {
            push(format!(
                "Status alterado de \"{}\" para \"{}\".",
                current.status, status
            ));
        }
    }

    if let Some(ref inspector) = changes.inspector {
        if !inspector.trim().is_empty() && current.inspector.as_deref() != Some(inspector) {
            push(format!("Fiscal {} foi atribuído.", inspector));
        }
    }

    if let Some(ref report) = changes.report {
        if !report.is_empty() && current.report.as_deref() != Some(report) {
            push("Relatório da constatação foi atualizado.".to_string());
        }
    }

    if let Some(ref actions) = changes.actions {
        if !actions_equal(actions, &current.actions) {
            push("Ações da fiscalização foram atualizadas.".to_string());
        }
    }

    if let Some(ref infractions) = changes.verified_infractions {
        if *infractions != current.verified_infractions {
            push("Tipos de infração verificada foram atualizados.".to_string());
        }
    }

    entries
}

/// The one automatic transition: scheduling a return visit forces the case
/// into `PendingFollowUp`. Returns the forced status (if any) and the audit
/// entries, status-change first so the trail reads in cause order.
pub fn plan_follow_up(
    current: &Inspection,
    date: NaiveDate,
    user: &str,
    now: DateTime<Utc>,
) -> (Option<InspectionStatus>, Vec<HistoryEntry>) {
    let mut entries = Vec::new();

    let forced = if current.status != InspectionStatus::PendingFollowUp {
        entries.push(HistoryEntry {
            timestamp: now,
            user: user.to_string(),
            change: format!(
                "Status alterado para \"{}\".",
                InspectionStatus::PendingFollowUp
            ),
        });
        Some(InspectionStatus::PendingFollowUp)
    } else {
        None
    };

    entries.push(HistoryEntry {
        timestamp: now,
        user: user.to_string(),
        change: format!(
            "Agendamento de retorno criado para {}.",
            date.format("%d/%m/%Y")
        ),
    });

    (forced, entries)
}

/// Audit entry for a newly attached photo.
pub fn photo_entry(photo_name: &str, user: &str, now: DateTime<Utc>) -> HistoryEntry {
    HistoryEntry {
        timestamp: now,
        user: user.to_string(),
        change: format!("Nova foto adicionada: {}.", photo_name),
    }
}

/// Prepend new entries and restore the newest-first invariant. The sort is
/// stable, so entries sharing a timestamp keep their insertion order.
pub fn merge_history(history: &mut Vec<HistoryEntry>, new_entries: Vec<HistoryEntry>) {
    history.splice(0..0, new_entries);
    history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InspectionSource, InspectionType};
    use chrono::TimeZone;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn sample_inspection() -> Inspection {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        Inspection {
            id: Uuid::new_v4(),
            protocol: "2024-001".to_string(),
            address: "Rua das Flores, 100".to_string(),
            latitude: None,
            longitude: None,
            source: InspectionSource::Internal,
            kind: InspectionType::ConstructionPermit,
            description: "Obra sem placa de alvará.".to_string(),
            status: InspectionStatus::Open,
            created_at: t,
            updated_at: t,
            inspector: None,
            report: None,
            report_summary: None,
            photos: vec![],
            follow_ups: vec![],
            actions: vec![],
            verified_infractions: BTreeMap::new(),
            complainant_name: None,
            complainant_address: None,
            respondent_name: None,
            contact_phone: None,
            attachments: vec![],
            reference_point: None,
            complaint_date: None,
            history: vec![],
        }
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 2, h, m, 0).unwrap()
    }

    #[test]
    fn test_initial_status_with_inspector() {
        assert_eq!(
            initial_status(Some("João Silva")),
            InspectionStatus::UnderReview
        );
        assert_eq!(initial_status(Some("  ")), InspectionStatus::Open);
        assert_eq!(initial_status(None), InspectionStatus::Open);
    }

    #[test]
    fn test_creation_entry_text_depends_on_assignment() {
        let now = at(9, 0);
        let assigned = creation_entry(Some("João Silva"), "Admin Geral", now);
        assert_eq!(
            assigned.change,
            "Chamado criado e atribuído para João Silva."
        );
        let unassigned = creation_entry(None, "Admin Geral", now);
        assert_eq!(unassigned.change, "Chamado criado.");
        assert_eq!(unassigned.user, "Admin Geral");
    }

    #[test]
    fn test_status_change_entry_names_both_states() {
        let current = sample_inspection();
        let changes = UpdateInspection {
            status: Some(InspectionStatus::InProgress),
            ..Default::default()
        };
        let entries = plan_update(&current, &changes, "João Silva", at(10, 0));
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].change,
            "Status alterado de \"Aberto\" para \"Em Andamento\"."
        );
    }

    #[test]
    fn test_unchanged_status_produces_no_entry() {
        let current = sample_inspection();
        let changes = UpdateInspection {
            status: Some(current.status),
            ..Default::default()
        };
        assert!(plan_update(&current, &changes, "João Silva", at(10, 0)).is_empty());
    }

    #[test]
    fn test_actions_compared_as_sets() {
        let mut current = sample_inspection();
        current.actions = vec![EnforcementAction::Notification, EnforcementAction::Fine];

        // Same set, different order: no entry.
        let reordered = UpdateInspection {
            actions: Some(vec![EnforcementAction::Fine, EnforcementAction::Notification]),
            ..Default::default()
        };
        assert!(plan_update(&current, &reordered, "João Silva", at(10, 0)).is_empty());

        // Different set: one entry.
        let grown = UpdateInspection {
            actions: Some(vec![
                EnforcementAction::Fine,
                EnforcementAction::Notification,
                EnforcementAction::Embargo,
            ]),
            ..Default::default()
        };
        let entries = plan_update(&current, &grown, "João Silva", at(10, 0));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].change, "Ações da fiscalização foram atualizadas.");
    }

    #[test]
    fn test_infraction_map_compared_by_full_equality() {
        let mut current = sample_inspection();
        current
            .verified_infractions
            .insert(InspectionType::Infiltration, true);

        let same = UpdateInspection {
            verified_infractions: Some(current.verified_infractions.clone()),
            ..Default::default()
        };
        assert!(plan_update(&current, &same, "Maria Oliveira", at(10, 0)).is_empty());

        let mut map = current.verified_infractions.clone();
        map.insert(InspectionType::BoundaryWall, true);
        let changed = UpdateInspection {
            verified_infractions: Some(map),
            ..Default::default()
        };
        let entries = plan_update(&current, &changed, "Maria Oliveira", at(10, 0));
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].change,
            "Tipos de infração verificada foram atualizados."
        );
    }

    #[test]
    fn test_multi_field_update_shares_one_timestamp() {
        let current = sample_inspection();
        let changes = UpdateInspection {
            status: Some(InspectionStatus::InProgress),
            inspector: Some("Maria Oliveira".to_string()),
            report: Some("Constatada obra irregular.".to_string()),
            ..Default::default()
        };
        let now = at(11, 30);
        let entries = plan_update(&current, &changes, "Admin Geral", now);
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.timestamp == now));
    }

    #[test]
    fn test_follow_up_forces_status_with_two_entries() {
        let current = sample_inspection();
        let date = NaiveDate::from_ymd_opt(2024, 4, 15).unwrap();
        let (forced, entries) = plan_follow_up(&current, date, "João Silva", at(14, 0));
        assert_eq!(forced, Some(InspectionStatus::PendingFollowUp));
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0].change,
            "Status alterado para \"Pendente de Retorno\"."
        );
        assert_eq!(
            entries[1].change,
            "Agendamento de retorno criado para 15/04/2024."
        );
    }

    #[test]
    fn test_follow_up_when_already_pending_emits_single_entry() {
        let mut current = sample_inspection();
        current.status = InspectionStatus::PendingFollowUp;
        let date = NaiveDate::from_ymd_opt(2024, 4, 15).unwrap();
        let (forced, entries) = plan_follow_up(&current, date, "João Silva", at(14, 0));
        assert_eq!(forced, None);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].change.starts_with("Agendamento de retorno"));
    }

    #[test]
    fn test_merge_history_keeps_newest_first() {
        let mut history = vec![
            HistoryEntry {
                timestamp: at(9, 0),
                user: "a".into(),
                change: "older".into(),
            },
            HistoryEntry {
                timestamp: at(8, 0),
                user: "a".into(),
                change: "oldest".into(),
            },
        ];
        merge_history(
            &mut history,
            vec![HistoryEntry {
                timestamp: at(10, 0),
                user: "b".into(),
                change: "newest".into(),
            }],
        );
        let changes: Vec<_> = history.iter().map(|e| e.change.as_str()).collect();
        assert_eq!(changes, vec!["newest", "older", "oldest"]);
    }

    #[test]
    fn test_merge_history_tie_break_preserves_insertion_order() {
        let now = at(14, 0);
        let mut history = Vec::new();
        merge_history(
            &mut history,
            vec![
                HistoryEntry {
                    timestamp: now,
                    user: "a".into(),
                    change: "first".into(),
                },
                HistoryEntry {
                    timestamp: now,
                    user: "a".into(),
                    change: "second".into(),
                },
            ],
        );
        let changes: Vec<_> = history.iter().map(|e| e.change.as_str()).collect();
        assert_eq!(changes, vec!["first", "second"]);
    }
}
