//! Single-record detail report
//!
//! The full paginated dossier of one case: identification grid, parties,
//! narrative, findings checklist, enforcement actions, photo evidence,
//! intake attachments, scheduled return visits and the signature block.

use printpdf::image_crate::DynamicImage;

use crate::models::{Inspection, Photo};
use crate::pdf::{DocWriter, PageHeader, PhotoContent, A4_PORTRAIT};
use crate::report::{format_date, format_datetime, ExportError};
use crate::validation::decode_data_uri;

pub fn file_name(inspection: &Inspection) -> String {
    format!("Relatorio-Fiscalizacao-{}.pdf", inspection.protocol)
}

pub fn render(inspection: &Inspection) -> Result<Vec<u8>, ExportError> {
    let mut writer = DocWriter::new(
        &format!("Relatório de Fiscalização {}", inspection.protocol),
        A4_PORTRAIT,
        Some(PageHeader {
            title: "GERÊNCIA DE FISCALIZAÇÃO DE OBRAS".to_string(),
            subtitle: "RELATÓRIO DE FISCALIZAÇÃO".to_string(),
        }),
        true,
    )?;

    let na = || "N/A".to_string();
    let opt = |value: &Option<String>| value.clone().filter(|v| !v.trim().is_empty());

    writer.section_header("Dados do Chamado");
    writer.grid_field(
        "PROTOCOLO",
        &inspection.protocol,
        "STATUS ATUAL",
        inspection.status.label(),
    );
    writer.grid_field(
        "DATA DE ABERTURA",
        &format_datetime(inspection.created_at),
        "DATA DA RECLAMAÇÃO",
        &inspection.complaint_date.map(format_date).unwrap_or_else(na),
    );
    writer.grid_field(
        "ORIGEM",
        inspection.source.label(),
        "TIPO DE FISCALIZAÇÃO",
        inspection.kind.label(),
    );
    writer.grid_field(
        "FISCAL RESPONSÁVEL",
        &opt(&inspection.inspector).unwrap_or_else(na),
        "",
        "",
    );

    writer.section_header("Localização & Partes Envolvidas");
    writer.full_width_field("ENDEREÇO DO RECLAMADO", &inspection.address);
    writer.full_width_field(
        "PONTO DE REFERÊNCIA",
        inspection.reference_point.as_deref().unwrap_or(""),
    );
    writer.grid_field(
        "RECLAMANTE",
        &opt(&inspection.complainant_name).unwrap_or_else(na),
        "RECLAMADO",
        &opt(&inspection.respondent_name).unwrap_or_else(na),
    );
    writer.grid_field(
        "ENDEREÇO DO RECLAMANTE",
        &opt(&inspection.complainant_address).unwrap_or_else(na),
        "TELEFONE DE CONTATO",
        &opt(&inspection.contact_phone).unwrap_or_else(na),
    );

    writer.section_header("Descrição Inicial da Ocorrência");
    let description = if inspection.description.trim().is_empty() {
        "Nenhuma descrição fornecida."
    } else {
        inspection.description.as_str()
    };
    writer.full_width_field("", description);

    writer.section_header("Constatação da Fiscalização");
    writer.full_width_field(
        "RELATÓRIO DA CONSTATAÇÃO",
        inspection.report.as_deref().unwrap_or(""),
    );

    writer.caption("TIPOS DE INFRAÇÃO VERIFICADA");
    let verified: Vec<String> = inspection
        .verified_infractions
        .iter()
        .filter(|(_, confirmed)| **confirmed)
        .map(|(kind, _)| kind.label().to_string())
        .collect();
    writer.bulleted_list(&verified, "Nenhuma infração verificada.");

    writer.caption("AÇÕES DA FISCALIZAÇÃO");
    let actions: Vec<String> = inspection.actions.iter().map(|a| a.label().to_string()).collect();
    writer.bulleted_list(&actions, "Nenhuma ação registrada.");

    writer.section_header("Evidências Anexadas");
    if !inspection.photos.is_empty() {
        writer.caption("RELATÓRIO FOTOGRÁFICO");
        let photos: Vec<PhotoContent> = inspection.photos.iter().map(resolve_photo).collect();
        writer.photo_grid(&photos);
    }
    if !inspection.attachments.is_empty() {
        writer.caption("DOCUMENTOS ANEXADOS NA ABERTURA");
        let names: Vec<String> = inspection.attachments.iter().map(|a| a.name.clone()).collect();
        writer.bulleted_list(&names, "Nenhum documento anexado.");
    }

    if !inspection.follow_ups.is_empty() {
        writer.section_header("Agendamentos de Retorno");
        for follow_up in &inspection.follow_ups {
            let state = if follow_up.completed {
                "Concluído"
            } else {
                "Pendente"
            };
            writer.grid_field(
                &format!("DATA: {}", format_date(follow_up.date)),
                &format!("Status: {}", state),
                "OBSERVAÇÕES",
                &follow_up.notes,
            );
        }
    }

    writer.signature_block("Fiscal de Obras e Urbanismo");
    writer.finish()
}

/// Data-URI photos are decoded and embedded; URL-only photos (external
/// object storage) render as a labelled frame instead of being fetched.
fn resolve_photo(photo: &Photo) -> PhotoContent {
    if photo.url.starts_with("data:") {
        if let Ok((_, bytes)) = decode_data_uri(&photo.url) {
            if let Ok(image) = printpdf::image_crate::load_from_memory(&bytes) {
                return PhotoContent::Bitmap(DynamicImage::ImageRgb8(image.to_rgb8()));
            }
        }
        tracing::warn!("Could not decode photo {} for the report", photo.name);
    }
    PhotoContent::Frame {
        name: photo.name.clone(),
    }
}
