//! Subject and HTML body of the outbound email.

use quick_xml::escape::escape;

use crate::models::config::{EmailLayout, IssuerProfile};

/// Recipient name used when neither invoice nor slip provides one.
pub const DEFAULT_RECIPIENT: &str = "Cliente";

/// Placeholder for a missing invoice number or amount.
const NOT_AVAILABLE: &str = "N/A";

/// One `Valor: ..., Vencimento: ...` line of the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlipLine {
    pub invoice_number: String,
    pub amount: String,
    pub due_date: String,
}

impl SlipLine {
    /// Line with `N/A` for any missing invoice number or amount.
    pub fn new(invoice_number: Option<&str>, amount: Option<&str>, due_date: &str) -> Self {
        Self {
            invoice_number: invoice_number
                .filter(|n| !n.is_empty())
                .unwrap_or(NOT_AVAILABLE)
                .to_string(),
            amount: amount
                .filter(|a| !a.is_empty())
                .unwrap_or(NOT_AVAILABLE)
                .to_string(),
            due_date: due_date.to_string(),
        }
    }
}

/// `Boleto e Nota Fiscal (NF1, NF2)`.
pub fn subject(invoice_numbers: &[String]) -> String {
    format!("Boleto e Nota Fiscal ({})", invoice_numbers.join(", "))
}

/// Greeting for the local hour: morning up to 12h, afternoon up to 18h.
pub fn greeting_for_hour(hour: u32) -> &'static str {
    match hour {
        0..=12 => "Bom dia,",
        13..=18 => "Boa tarde,",
        _ => "Boa noite,",
    }
}

/// Render the HTML body for one email group.
///
/// Recipient, issuer and invoice values are escaped. Layout fragments are
/// inserted as given so operators may use inline markup.
pub fn render_html(
    greeting: &str,
    recipient: &str,
    lines: &[SlipLine],
    issuer: &IssuerProfile,
    layout: &EmailLayout,
) -> String {
    let single = lines.len() == 1;
    let boleto = if single { "boleto" } else { "boletos" };
    let nota = if single { "nota" } else { "notas" };
    let verb = if single { "esta" } else { "estao" };
    let issued = if single { "emitido" } else { "emitidos" };

    let numbers = lines
        .iter()
        .map(|l| l.invoice_number.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut values = String::new();
    for line in lines {
        values.push_str(&format!(
            "<p>Valor: {}, Vencimento: {}</p>\n",
            escape(line.amount.as_str()),
            escape(line.due_date.as_str())
        ));
    }

    let signature_image = layout
        .signature_image_cid
        .as_deref()
        .filter(|cid| !cid.is_empty())
        .map(|cid| {
            format!(
                "<img src=\"cid:{}\" alt=\"{}\" style=\"max-width: 500px; height: auto;\" />\n",
                escape(cid),
                escape(layout.signature.as_str())
            )
        })
        .unwrap_or_default();

    format!(
        r#"<html>
<body style="font-family: Arial, sans-serif; font-size: 14px; color: #333;">
<p>{greeting}</p>

<p>{introduction}<br>
<strong>{recipient}</strong>,</p>

<p>Enviamos anexo o(s) seu(s) {boleto} {issued} conforme a(s) {nota}: <strong>{numbers}</strong></p>

{values}
<p>O(s) {boleto} {verb} com beneficiario nominal a <strong>{issuer_name}</strong>, CNPJ: <strong>{issuer_tax_id}</strong>.</p>

<p>Vide {boleto} e {nota} em anexo.<br>
Favor confirmar recebimento.</p>

<p>{closing}</p>

<p>Atenciosamente,<br>
<strong>{signature}</strong></p>
{signature_image}</body>
</html>"#,
        introduction = layout.introduction,
        recipient = escape(recipient),
        numbers = escape(numbers.as_str()),
        issuer_name = escape(issuer.full_name.as_str()),
        issuer_tax_id = escape(issuer.tax_id.as_str()),
        closing = layout.closing,
        signature = layout.signature,
    )
}
