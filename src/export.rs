//! Report document export. All three formats deliver an HTML body the
//! browser can print or convert; only the attachment filename differs.

use serde::{Deserialize, Serialize};

/// Export flavors accepted by the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Html,
    Docx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Html => "html",
            Self::Docx => "docx",
        }
    }
}

/// The report payload the doctor-facing client sends for export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportExportData {
    pub patient_name: String,
    pub doctor_name: String,
    pub doctor_specialty: String,
    pub affected_percentage: Option<f64>,
    pub is_edited: bool,
    pub content: String,
    pub patient_info: PatientInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientInfo {
    pub referring_physician: String,
    pub chief_complaint: String,
    pub medical_history: String,
    pub current_medications: String,
    pub known_allergies: String,
    pub family_history: String,
}

/// Attachment filename for a rendered report.
pub fn attachment_filename(data: &ReportExportData, format: ExportFormat) -> String {
    let base = if data.patient_name.trim().is_empty() {
        "patient"
    } else {
        data.patient_name.trim()
    };
    format!("{}_report.{}", base.replace(' ', "_"), format.extension())
}

/// Render the report as a self-contained HTML document.
pub fn render_html(data: &ReportExportData, generated_at: &str) -> String {
    let or_na = |s: &str| {
        if s.trim().is_empty() {
            "N/A".to_string()
        } else {
            escape(s)
        }
    };
    let affected = data
        .affected_percentage
        .map(|p| format!("{p:.2}"))
        .unwrap_or_else(|| "N/A".into());
    let status = if data.is_edited { "Edited" } else { "AI Generated" };
    let content = if data.content.trim().is_empty() {
        "No report content available".to_string()
    } else {
        escape(&data.content)
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>Medical Report - {patient}</title>
<style>
body {{ font-family: Arial, sans-serif; margin: 40px; }}
.header {{ text-align: center; border-bottom: 2px solid #333; padding-bottom: 20px; margin-bottom: 30px; }}
.section {{ margin-bottom: 25px; }}
.section h2 {{ color: #2c5aa0; border-bottom: 1px solid #ccc; padding-bottom: 5px; }}
.info-grid {{ display: grid; grid-template-columns: 1fr 1fr; gap: 20px; }}
.patient-info {{ background: #f5f5f5; padding: 15px; border-radius: 5px; }}
.report-content {{ white-space: pre-wrap; line-height: 1.6; }}
.footer {{ margin-top: 40px; text-align: center; font-size: 12px; color: #666; }}
</style>
</head>
<body>
<div class="header">
<h1>Medical Imaging Report</h1>
<p>Generated on {generated_at}</p>
</div>
<div class="section">
<h2>Patient Information</h2>
<div class="info-grid">
<div class="patient-info">
<strong>Patient Name:</strong> {patient}<br>
<strong>Referring Physician:</strong> {referring}<br>
<strong>Report Generated By:</strong> {doctor} ({specialty})
</div>
<div class="patient-info">
<strong>Chief Complaint:</strong> {complaint}<br>
<strong>Affected Area:</strong> {affected}%<br>
<strong>Report Status:</strong> {status}
</div>
</div>
</div>
<div class="section">
<h2>Clinical History</h2>
<div class="patient-info">
<strong>Medical History:</strong> {history}<br><br>
<strong>Current Medications:</strong> {medications}<br><br>
<strong>Known Allergies:</strong> {allergies}<br><br>
<strong>Family History:</strong> {family}
</div>
</div>
<div class="section">
<h2>AI Analysis Report</h2>
<div class="report-content">{content}</div>
</div>
<div class="footer">
<p>This report was generated using AI-assisted medical imaging analysis.</p>
<p>Please review all findings with qualified medical professionals.</p>
</div>
</body>
</html>
"#,
        patient = or_na(&data.patient_name),
        referring = or_na(&data.patient_info.referring_physician),
        doctor = or_na(&data.doctor_name),
        specialty = or_na(&data.doctor_specialty),
        complaint = or_na(&data.patient_info.chief_complaint),
        history = or_na(&data.patient_info.medical_history),
        medications = or_na(&data.patient_info.current_medications),
        allergies = or_na(&data.patient_info.known_allergies),
        family = or_na(&data.patient_info.family_history),
    )
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ReportExportData {
        ReportExportData {
            patient_name: "Jane Doe".into(),
            doctor_name: "Dr. Sarah Johnson".into(),
            doctor_specialty: "Neurology".into(),
            affected_percentage: Some(12.345),
            is_edited: true,
            content: "Findings: small lesion.".into(),
            patient_info: PatientInfo {
                referring_physician: "Dr. Emily Rodriguez".into(),
                chief_complaint: "Severe headache".into(),
                medical_history: "Hypertension".into(),
                current_medications: "Lisinopril".into(),
                known_allergies: "Penicillin".into(),
                family_history: "Heart disease".into(),
            },
        }
    }

    #[test]
    fn renders_all_sections() {
        let html = render_html(&sample(), "August 6, 2025");
        assert!(html.contains("Jane Doe"));
        assert!(html.contains("Dr. Sarah Johnson"));
        assert!(html.contains("12.35%"));
        assert!(html.contains("Edited"));
        assert!(html.contains("Findings: small lesion."));
        assert!(html.contains("August 6, 2025"));
    }

    #[test]
    fn missing_values_render_as_na() {
        let html = render_html(&ReportExportData::default(), "now");
        assert!(html.contains("N/A"));
        assert!(html.contains("No report content available"));
        assert!(html.contains("AI Generated"));
    }

    #[test]
    fn content_is_html_escaped() {
        let mut data = sample();
        data.content = "<script>alert(1)</script>".into();
        let html = render_html(&data, "now");
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn attachment_filenames() {
        let data = sample();
        assert_eq!(attachment_filename(&data, ExportFormat::Pdf), "Jane_Doe_report.pdf");
        assert_eq!(attachment_filename(&data, ExportFormat::Html), "Jane_Doe_report.html");
        let empty = ReportExportData::default();
        assert_eq!(attachment_filename(&empty, ExportFormat::Docx), "patient_report.docx");
    }

    #[test]
    fn format_parses_from_lowercase_json() {
        let f: ExportFormat = serde_json::from_str("\"pdf\"").unwrap();
        assert_eq!(f, ExportFormat::Pdf);
    }
}
