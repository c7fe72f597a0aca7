//! Reading the sidebar's filter widgets from the query string.
//!
//! All widget state travels in the URL, so a rerun is a pure function of the
//! query string. Unselected widgets map to "no filter" defaults and nothing
//! here can fail: unparseable values simply fall back to the defaults.

use serde::Deserialize;

/// The fixed region options offered by the sidebar.
///
/// "Brasil" means nationwide, which the sales API expects as an empty
/// `regiao` parameter.
pub const REGIOES: [&str; 6] = [
    "Brasil",
    "Centro-Oeste",
    "Nordeste",
    "Norte",
    "Sudeste",
    "Sul",
];

/// The first year covered by the sales API.
pub const ANO_MIN: i32 = 2020;
/// The last year covered by the sales API.
pub const ANO_MAX: i32 = 2023;

/// The smallest accepted top-seller count.
pub const QTD_VENDEDORES_MIN: usize = 2;
/// The largest accepted top-seller count.
pub const QTD_VENDEDORES_MAX: usize = 10;
/// The top-seller count used when the input is absent.
pub const QTD_VENDEDORES_PADRAO: usize = 5;

/// The raw widget state as submitted in the query string.
///
/// Every field is optional because the first page load has no query string at
/// all and unchecked checkboxes are simply absent. `filtros` is a hidden
/// marker field included by the sidebar form so that an absent checkbox can
/// be told apart from the initial load.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    /// The selected region name, e.g. "Sul".
    #[serde(default)]
    pub regiao: Option<String>,
    /// Marker field proving the query string came from the sidebar form.
    #[serde(default)]
    pub filtros: Option<u8>,
    /// Present when the "all periods" checkbox is checked.
    #[serde(default)]
    pub todos_periodos: Option<String>,
    /// The year slider value.
    #[serde(default)]
    pub ano: Option<i32>,
    /// The seller multi-select values.
    #[serde(default)]
    pub vendedores: Vec<String>,
    /// The top-seller count input on the Vendedores tab.
    #[serde(default)]
    pub qtd_vendedores: Option<usize>,
}

/// The normalized filter selection driving one rerun.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSelection {
    /// Region sent to the API; `None` is nationwide.
    pub regiao: Option<String>,
    /// Year sent to the API; `None` means all periods.
    pub ano: Option<i32>,
    /// The local seller post-filter; empty means no filter.
    pub vendedores: Vec<String>,
    /// How many top sellers to chart.
    pub qtd_vendedores: usize,
}

impl FilterSelection {
    /// Normalize raw query parameters into a filter selection.
    ///
    /// Selecting "Brasil" is the same as selecting no region at all. On the
    /// initial load (no `filtros` marker) the year filter defaults to "all
    /// periods"; once the form has been submitted, an absent checkbox means
    /// the user just unchecked it, which reveals the slider at its minimum.
    pub fn from_params(params: &DashboardParams) -> Self {
        let regiao = params
            .regiao
            .as_deref()
            .filter(|regiao| !regiao.is_empty() && *regiao != "Brasil")
            .map(str::to_owned);

        let todos_periodos = params.filtros.is_none() || params.todos_periodos.is_some();
        let ano = if todos_periodos {
            None
        } else {
            Some(params.ano.unwrap_or(ANO_MIN).clamp(ANO_MIN, ANO_MAX))
        };

        let vendedores = params
            .vendedores
            .iter()
            .filter(|vendedor| !vendedor.is_empty())
            .cloned()
            .collect();

        let qtd_vendedores = params
            .qtd_vendedores
            .unwrap_or(QTD_VENDEDORES_PADRAO)
            .clamp(QTD_VENDEDORES_MIN, QTD_VENDEDORES_MAX);

        Self {
            regiao,
            ano,
            vendedores,
            qtd_vendedores,
        }
    }

    /// The query parameters sent to the sales API.
    ///
    /// Both parameters are always present, empty when unfiltered, matching
    /// what the API expects. The seller filter is never sent to the server.
    pub fn query_params(&self) -> [(&'static str, String); 2] {
        [
            (
                "regiao",
                self.regiao.as_deref().unwrap_or("").to_lowercase(),
            ),
            (
                "ano",
                self.ano.map(|ano| ano.to_string()).unwrap_or_default(),
            ),
        ]
    }

    /// The region name to show as selected in the sidebar.
    pub fn regiao_exibida(&self) -> &str {
        self.regiao.as_deref().unwrap_or("Brasil")
    }
}
