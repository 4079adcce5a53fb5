//! Data models for the application

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

// =============================================================================
// Enums
// =============================================================================

/// Lifecycle state of an inspection case.
///
/// The enum order is the display convention of the intake-to-closure flow;
/// it is not an enforced sequence. Any status may be selected directly from
/// the edit surface. See `lifecycle` for the one automatic transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectionStatus {
    Open,
    UnderReview,
    InProgress,
    PendingFollowUp,
    Closed,
}

impl InspectionStatus {
    pub const ALL: [InspectionStatus; 5] = [
        InspectionStatus::Open,
        InspectionStatus::UnderReview,
        InspectionStatus::InProgress,
        InspectionStatus::PendingFollowUp,
        InspectionStatus::Closed,
    ];

    /// Display label as printed on reports and history entries.
    pub fn label(&self) -> &'static str {
        match self {
            InspectionStatus::Open => "Aberto",
            InspectionStatus::UnderReview => "Em Análise",
            InspectionStatus::InProgress => "Em Andamento",
            InspectionStatus::PendingFollowUp => "Pendente de Retorno",
            InspectionStatus::Closed => "Concluído",
        }
    }
}

impl std::fmt::Display for InspectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Origin of the complaint that opened the case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectionSource {
    Internal,
    CitizenInPerson,
    CitizenWhatsapp,
    CitizenEmail,
    PublicMinistry,
    Ombudsman,
    CivilDefense,
    OtherDepartments,
}

impl InspectionSource {
    pub fn label(&self) -> &'static str {
        match self {
            InspectionSource::Internal => "Gerência",
            InspectionSource::CitizenInPerson => "Contribuinte (Presencial)",
            InspectionSource::CitizenWhatsapp => "Contribuinte (WhatsApp)",
            InspectionSource::CitizenEmail => "Contribuinte (Email)",
            InspectionSource::PublicMinistry => "Ministério Público",
            InspectionSource::Ombudsman => "Ouvidoria Municipal",
            InspectionSource::CivilDefense => "Defesa Civil",
            InspectionSource::OtherDepartments => "Outras Secretarias",
        }
    }
}

impl std::fmt::Display for InspectionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Violation category under inspection.
///
/// Also used as the key of the verified-infraction checklist, hence the
/// `Ord` derive (the checklist is a sorted map).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum InspectionType {
    ConstructionPermit,
    ApprovedProject,
    OccupancyPermit,
    BusinessPermit,
    LandParcelling,
    WorkInDisagreementWithApprovedProject,
    DemolitionWithoutPermit,
    EarthmovingWithoutPermit,
    Elevators,
    OpeningOnBoundary,
    SidewalkAccessibility,
    Infiltration,
    AcousticInsulation,
    MarqueesAndRoofs,
    MaterialsOnStreet,
    BoundaryWall,
    PropertyMaintenance,
    Other,
}

impl InspectionType {
    pub const ALL: [InspectionType; 18] = [
        InspectionType::ConstructionPermit,
        InspectionType::ApprovedProject,
        InspectionType::OccupancyPermit,
        InspectionType::BusinessPermit,
        InspectionType::LandParcelling,
        InspectionType::WorkInDisagreementWithApprovedProject,
        InspectionType::DemolitionWithoutPermit,
        InspectionType::EarthmovingWithoutPermit,
        InspectionType::Elevators,
        InspectionType::OpeningOnBoundary,
        InspectionType::SidewalkAccessibility,
        InspectionType::Infiltration,
        InspectionType::AcousticInsulation,
        InspectionType::MarqueesAndRoofs,
        InspectionType::MaterialsOnStreet,
        InspectionType::BoundaryWall,
        InspectionType::PropertyMaintenance,
        InspectionType::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            InspectionType::ConstructionPermit => "Alvará de Construção",
            InspectionType::ApprovedProject => "Projeto Aprovado",
            InspectionType::OccupancyPermit => "Habite-se / Ocupação",
            InspectionType::BusinessPermit => "Alvará de Funcionamento",
            InspectionType::LandParcelling => "Parcelamento do Solo",
            InspectionType::WorkInDisagreementWithApprovedProject => {
                "Obra em desacordo com projeto aprovado"
            }
            InspectionType::DemolitionWithoutPermit => "Demolição sem alvará de licença",
            InspectionType::EarthmovingWithoutPermit => {
                "Movimentação de terra sem alvará de licença"
            }
            InspectionType::Elevators => "Elevadores",
            InspectionType::OpeningOnBoundary => "Abertura na divisa",
            InspectionType::SidewalkAccessibility => "Acessibilidade em calçadas",
            InspectionType::Infiltration => "Infiltração",
            InspectionType::AcousticInsulation => "Isolamento acústico",
            InspectionType::MarqueesAndRoofs => "Marquise e coberturas",
            InspectionType::MaterialsOnStreet => "Material e massa na rua",
            InspectionType::BoundaryWall => "Muro de vedação",
            InspectionType::PropertyMaintenance => "Zelar pelas boas condições do imóvel",
            InspectionType::Other => "Outro",
        }
    }
}

impl std::fmt::Display for InspectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Enforcement action recorded against a case. Stored with set semantics:
/// a case never lists the same action twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnforcementAction {
    Oriented,
    Notification,
    Fine,
    Seizure,
    Embargo,
    Interdiction,
    Demolition,
}

impl EnforcementAction {
    pub const ALL: [EnforcementAction; 7] = [
        EnforcementAction::Oriented,
        EnforcementAction::Notification,
        EnforcementAction::Fine,
        EnforcementAction::Seizure,
        EnforcementAction::Embargo,
        EnforcementAction::Interdiction,
        EnforcementAction::Demolition,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EnforcementAction::Oriented => "Contribuinte Orientado",
            EnforcementAction::Notification => "Notificação",
            EnforcementAction::Fine => "Autuação",
            EnforcementAction::Seizure => "Apreensão",
            EnforcementAction::Embargo => "Embargo",
            EnforcementAction::Interdiction => "Interdição",
            EnforcementAction::Demolition => "Demolição",
        }
    }
}

impl std::fmt::Display for EnforcementAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Inspector,
}

impl UserRole {
    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Admin => "Administrador",
            UserRole::Inspector => "Fiscal",
        }
    }
}

// =============================================================================
// Inspection
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: Uuid,
    pub url: String,
    pub name: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUp {
    pub id: Uuid,
    pub date: NaiveDate,
    pub notes: String,
    pub completed: bool,
}

/// Document captured at intake time, carried inline as a base64 data URI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub user: String,
    pub change: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inspection {
    pub id: Uuid,
    /// Human-readable case number, assigned once at creation.
    pub protocol: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub source: InspectionSource,
    #[serde(rename = "type")]
    pub kind: InspectionType,
    pub description: String,
    pub status: InspectionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub inspector: Option<String>,
    pub report: Option<String>,
    pub report_summary: Option<String>,
    pub photos: Vec<Photo>,
    pub follow_ups: Vec<FollowUp>,
    pub actions: Vec<EnforcementAction>,
    pub verified_infractions: BTreeMap<InspectionType, bool>,
    pub complainant_name: Option<String>,
    pub complainant_address: Option<String>,
    pub respondent_name: Option<String>,
    pub contact_phone: Option<String>,
    pub attachments: Vec<Attachment>,
    pub reference_point: Option<String>,
    pub complaint_date: Option<NaiveDate>,
    /// Audit trail, kept sorted newest-first.
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateInspection {
    pub address: String,
    pub source: Option<InspectionSource>,
    #[serde(rename = "type")]
    pub kind: Option<InspectionType>,
    pub description: Option<String>,
    pub inspector: Option<String>,
    pub complainant_name: Option<String>,
    pub complainant_address: Option<String>,
    pub respondent_name: Option<String>,
    pub contact_phone: Option<String>,
    pub reference_point: Option<String>,
    pub complaint_date: Option<NaiveDate>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Edit-surface fields. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateInspection {
    pub status: Option<InspectionStatus>,
    pub inspector: Option<String>,
    pub report: Option<String>,
    pub report_summary: Option<String>,
    pub actions: Option<Vec<EnforcementAction>>,
    pub verified_infractions: Option<BTreeMap<InspectionType, bool>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddPhoto {
    pub url: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddFollowUp {
    pub date: NaiveDate,
    pub notes: String,
}

// =============================================================================
// User Account
// =============================================================================

#[derive(Debug, Clone)]
pub struct UserAccount {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub role: UserRole,
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub role: UserRole,
}

impl From<UserAccount> for UserResponse {
    fn from(user: UserAccount) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub username: String,
    pub role: UserRole,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub username: Option<String>,
    pub role: Option<UserRole>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// =============================================================================
// API Responses
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}
