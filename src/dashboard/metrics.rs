//! The metric callouts shown at the top of each tab.

use std::sync::OnceLock;

use maud::{Markup, html};
use numfmt::{Formatter, Precision};

/// Compact human-readable number, scaled to "mil" or "milhões".
///
/// Values below a thousand keep a trailing space where the unit would go,
/// e.g. `formata_numero(500.0, "")` is `"500.00 "`.
pub fn formata_numero(valor: f64, prefixo: &str) -> String {
    let mut valor = valor;
    for unidade in ["", "mil"] {
        if valor < 1000.0 {
            return format!("{prefixo}{valor:.2} {unidade}");
        }
        valor /= 1000.0;
    }

    format!("{prefixo}{valor:.2} milhões")
}

/// Full revenue value with thousands separators, e.g. "R$4,403.00".
pub fn moeda_completa(valor: f64) -> String {
    static FMT: OnceLock<Formatter> = OnceLock::new();

    let fmt = FMT.get_or_init(|| {
        Formatter::currency("R$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    if valor == 0.0 {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        return "R$0.00".to_owned();
    }

    let mut formatted_string = fmt.fmt_string(valor);

    // numfmt omits the last trailing zero, so we must add it ourselves
    // For example, "12.30" is rendered as "12.3" so we append "0".
    if formatted_string.as_bytes()[formatted_string.len() - 3] != b'.' {
        formatted_string = format!("{formatted_string}0");
    }

    formatted_string
}

/// Full sale count with thousands separators.
pub fn contagem_completa(quantidade: usize) -> String {
    static FMT: OnceLock<Formatter> = OnceLock::new();

    let fmt = FMT.get_or_init(|| {
        Formatter::new()
            .separator(',')
            .unwrap()
            .precision(Precision::Decimals(0))
    });

    fmt.fmt_string(quantidade as f64)
}

/// Render one metric callout. The exact value goes in the tooltip.
pub fn metric_view(rotulo: &str, valor: &str, valor_completo: &str) -> Markup {
    html! {
        div
            class="p-4 bg-white rounded-lg shadow dark:bg-gray-800"
            title=(valor_completo)
        {
            p class="text-sm text-gray-500 dark:text-gray-400" { (rotulo) }
            p class="text-2xl font-semibold" { (valor) }
        }
    }
}

#[cfg(test)]
mod metrics_tests {
    use super::{contagem_completa, formata_numero, metric_view, moeda_completa};

    #[test]
    fn small_values_keep_two_decimals_and_no_unit() {
        assert_eq!(formata_numero(500.0, ""), "500.00 ");
    }

    #[test]
    fn thousands_are_scaled_to_mil() {
        assert_eq!(formata_numero(1500.0, ""), "1.50 mil");
    }

    #[test]
    fn millions_are_scaled_to_milhoes() {
        assert_eq!(formata_numero(2_500_000.0, ""), "2.50 milhões");
    }

    #[test]
    fn prefix_is_prepended_verbatim() {
        assert_eq!(formata_numero(1500.0, "R$ "), "R$ 1.50 mil");
    }

    #[test]
    fn full_currency_has_separators_and_two_decimals() {
        assert_eq!(moeda_completa(4403.0), "R$4,403.00");
        assert_eq!(moeda_completa(12.3), "R$12.30");
        assert_eq!(moeda_completa(0.0), "R$0.00");
    }

    #[test]
    fn full_count_has_separators() {
        assert_eq!(contagem_completa(12345), "12,345");
    }

    #[test]
    fn metric_view_puts_the_exact_value_in_the_tooltip() {
        let markup = metric_view("Receita", "R$ 4.40 mil", "R$4,403.00").into_string();

        assert!(markup.contains(r#"title="R$4,403.00""#));
        assert!(markup.contains("Receita"));
        assert!(markup.contains("R$ 4.40 mil"));
    }
}
