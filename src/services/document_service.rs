// src/services/document_service.rs

use genpdf::{elements, style, Element};

use crate::{
    common::error::AppError,
    models::report::FinancialReport,
};

// Cabeçalhos da planilha, em italiano (idioma de trabalho da agência)
const CSV_HEADERS: [&str; 9] = [
    "Numero Pratica",
    "Numero Prenotazione",
    "Nome Cliente",
    "Data Conferma Pratica",
    "Data Partenza",
    "Fatturato Lordo (€)",
    "Commissione Fornitore (€)",
    "Sconti Applicati (€)",
    "Commissione Agente (€)",
];

#[derive(Clone)]
pub struct DocumentService;

impl DocumentService {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  PLANILHA (CSV, abre direto no Excel)
    // =========================================================================

    pub fn report_csv(&self, report: &FinancialReport) -> Result<Vec<u8>, AppError> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer
            .write_record(CSV_HEADERS)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        for trip in &report.detailed_trips {
            writer
                .write_record([
                    trip.practice_number.as_str(),
                    trip.booking_number.as_str(),
                    trip.client_name.as_str(),
                    &trip.practice_confirm_date.format("%d/%m/%Y").to_string(),
                    &trip.client_departure_date.format("%d/%m/%Y").to_string(),
                    &trip.gross_amount.to_string(),
                    &trip.supplier_commission.to_string(),
                    &trip.discount.to_string(),
                    &trip.agent_commission.to_string(),
                ])
                .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;
        }

        writer
            .into_inner()
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))
    }

    // =========================================================================
    //  PDF
    // =========================================================================

    pub fn report_pdf(&self, report: &FinancialReport) -> Result<Vec<u8>, AppError> {
        // Carrega a fonte da pasta 'fonts/'
        let font_family = genpdf::fonts::from_files("./fonts", "Roboto", None)
            .map_err(|_| AppError::FontNotFound("Fonte não encontrada na pasta ./fonts".to_string()))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Report Finanziario {}", report.period.year));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        doc.push(
            elements::Paragraph::new("REPORT FINANZIARIO")
                .styled(style::Style::new().bold().with_font_size(18)),
        );

        let period_line = match report.period.month {
            Some(month) => format!("Periodo: {:02}/{}", month, report.period.year),
            None => format!("Anno: {}", report.period.year),
        };
        doc.push(elements::Paragraph::new(period_line));
        doc.push(elements::Break::new(1.5));

        // --- TABELA DE PRATICHE ---
        // Pesos das colunas: Pratica (2), Cliente (3), Lordo (2), Comm. Agente (2)
        let mut table = elements::TableLayout::new(vec![2, 3, 2, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("Pratica").styled(style_bold))
            .element(elements::Paragraph::new("Cliente").styled(style_bold))
            .element(elements::Paragraph::new("Lordo").styled(style_bold))
            .element(elements::Paragraph::new("Comm. Agente").styled(style_bold))
            .push()
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        for trip in &report.detailed_trips {
            table
                .row()
                .element(elements::Paragraph::new(trip.practice_number.clone()))
                .element(elements::Paragraph::new(trip.client_name.clone()))
                .element(elements::Paragraph::new(format!("€ {:.2}", trip.gross_amount)))
                .element(elements::Paragraph::new(format!("€ {:.2}", trip.agent_commission)))
                .push()
                .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;
        }

        doc.push(table);
        doc.push(elements::Break::new(2));

        // --- TOTAIS ---
        let mut totals_paragraph = elements::Paragraph::new(format!(
            "TOTALE LORDO: € {:.2}  |  COMMISSIONI AGENTI: € {:.2}  |  PRATICHE: {}",
            report.totals.gross_revenue, report.totals.agent_commissions, report.totals.total_trips
        ));
        totals_paragraph.set_alignment(genpdf::Alignment::Right);
        doc.push(totals_paragraph.styled(style::Style::new().bold().with_font_size(12)));

        // Renderiza para Buffer (Memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        Ok(buffer)
    }

    /// Nome do arquivo exportado: report_finanziario[_ano[_mes]].ext
    pub fn report_filename(year: i32, month: Option<u32>, extension: &str) -> String {
        match month {
            Some(m) => format!("report_finanziario_{year}_{m:02}.{extension}"),
            None => format!("report_finanziario_{year}.{extension}"),
        }
    }
}

impl Default for DocumentService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::finance::AdminStatus;
    use crate::models::report::{DetailedTripRow, ReportPeriod, ReportTotals};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn sample_report() -> FinancialReport {
        let row = DetailedTripRow {
            id: Uuid::new_v4(),
            trip_id: Uuid::new_v4(),
            trip_title: "Crociera".to_string(),
            trip_destination: "Barcellona".to_string(),
            client_name: "Maria Rossi".to_string(),
            client_email: "maria@example.com".to_string(),
            agent_name: "Luca Bianchi".to_string(),
            agent_email: "luca@example.com".to_string(),
            practice_number: "PRA-1".to_string(),
            booking_number: "BK-1".to_string(),
            gross_amount: dec!(1500),
            net_amount: dec!(1200),
            discount: dec!(0),
            confirmation_deposit: dec!(0),
            supplier_commission_rate: dec!(4),
            gross_commission: dec!(300),
            supplier_commission: dec!(60),
            agent_commission: dec!(240),
            balance_due: dec!(1500),
            practice_confirm_date: Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap(),
            client_departure_date: Utc.with_ymd_and_hms(2025, 7, 1, 8, 0, 0).unwrap(),
            status: AdminStatus::Confirmed,
        };

        FinancialReport {
            period: ReportPeriod {
                year: 2025,
                month: None,
                agent_id: None,
            },
            totals: ReportTotals {
                total_trips: 1,
                gross_revenue: dec!(1500),
                net_revenue: dec!(1200),
                total_discounts: dec!(0),
                supplier_commissions: dec!(60),
                agent_commissions: dec!(240),
            },
            monthly_breakdown: vec![],
            detailed_trips: vec![row],
            can_export_excel: true,
        }
    }

    #[test]
    fn test_csv_has_header_and_one_line_per_trip() {
        let service = DocumentService::new();
        let bytes = service.report_csv(&sample_report()).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let lines: Vec<&str> = text.trim_end().lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Numero Pratica,Numero Prenotazione"));
        assert!(lines[1].contains("PRA-1"));
        assert!(lines[1].contains("Maria Rossi"));
        assert!(lines[1].contains("15/03/2025"));
        assert!(lines[1].contains("240"));
    }

    #[test]
    fn test_filename_variants() {
        assert_eq!(
            DocumentService::report_filename(2025, None, "csv"),
            "report_finanziario_2025.csv"
        );
        assert_eq!(
            DocumentService::report_filename(2025, Some(3), "pdf"),
            "report_finanziario_2025_03.pdf"
        );
    }

    #[test]
    fn test_csv_escapes_commas_in_names() {
        let service = DocumentService::new();
        let mut report = sample_report();
        report.detailed_trips[0].client_name = "Rossi, Maria".to_string();

        let bytes = service.report_csv(&report).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\"Rossi, Maria\""));
    }
}
