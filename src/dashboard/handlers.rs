//! The dashboard page handler and its views.
//!
//! Every filter widget lives in a sidebar form whose state travels in the
//! query string. Changing any widget makes htmx re-request the page and swap
//! the whole panel, so the handler is a pure function from the query string
//! to the rendered dashboard.

use axum::{extract::State, response::IntoResponse, response::Response};
use axum_extra::extract::Query;
use axum_htmx::HxRequest;
use maud::{Markup, PreEscaped, html};

use crate::{
    AppState, Error,
    api::{Sale, apply_seller_filter, unique_sellers},
    dashboard::{
        aggregation::{
            receita_mensal, receita_por_categoria, receita_por_estado, receita_total,
            resumo_vendedores, top_por_receita, top_por_vendas, vendas_mensais,
            vendas_por_categoria, vendas_por_estado,
        },
        charts::{
            DashboardChart, barras_categorias, barras_estados, barras_vendedores, charts_script,
            charts_view, linha_receita_mensal, linha_vendas_mensais, mapa_receita, mapa_vendas,
        },
        metrics::{contagem_completa, formata_numero, metric_view, moeda_completa},
    },
    endpoints,
    filters::{ANO_MAX, ANO_MIN, DashboardParams, FilterSelection, QTD_VENDEDORES_MAX,
        QTD_VENDEDORES_MIN, REGIOES},
    html::{HeadElement, PAGE_CONTAINER_STYLE, base},
};

/// How many states the per-state bar charts show.
const TOP_ESTADOS: usize = 5;

const ECHARTS_CDN: &str = "https://cdn.jsdelivr.net/npm/echarts@5.6.0/dist/echarts.min.js";

/// Render the sales dashboard for the filters in the query string.
///
/// htmx requests get just the swappable panel, everything else gets the full
/// page.
///
/// # Errors
///
/// Returns an [`Error`] if the sales API request fails, which renders as an
/// internal server error page.
pub async fn get_dashboard_page(
    State(state): State<AppState>,
    HxRequest(is_htmx_request): HxRequest,
    Query(params): Query<DashboardParams>,
) -> Result<Response, Error> {
    let selection = FilterSelection::from_params(&params);

    let sales = state.sales_api.fetch_sales(&selection).await?;
    tracing::debug!(
        quantidade = sales.len(),
        regiao = selection.regiao_exibida(),
        "vendas recebidas da API"
    );

    // Seller options come from the server-filtered data, before the local
    // seller filter narrows it further.
    let opcoes_vendedores = unique_sellers(&sales);
    let sales = apply_seller_filter(sales, &selection.vendedores);

    let painel = painel_view(&selection, &opcoes_vendedores, &sales);

    if is_htmx_request {
        return Ok(painel.into_response());
    }

    let content = html! {
        h1 class="text-3xl font-bold px-4 pt-6 text-center" { "DASHBOARD DE VENDAS 🛒" }
        (painel)
    };

    Ok(base(
        "Dashboard",
        &[HeadElement::ScriptLink(ECHARTS_CDN.to_owned())],
        &content,
    )
    .into_response())
}

/// The swappable panel: sidebar, tabs and the chart init script.
fn painel_view(
    selection: &FilterSelection,
    opcoes_vendedores: &[String],
    sales: &[Sale],
) -> Markup {
    html! {
        div id="painel" class=(PAGE_CONTAINER_STYLE)
        {
            (sidebar_view(selection, opcoes_vendedores))

            main class="grow min-w-0"
            {
                @if sales.is_empty() {
                    (sem_dados_view())
                } @else {
                    (tabs_view(selection, sales))
                }
            }
        }
    }
}

fn sem_dados_view() -> Markup {
    html! {
        div class="p-8 bg-white rounded-lg shadow dark:bg-gray-800 text-center"
        {
            p class="text-xl font-semibold" { "Nenhum dado para exibir" }
            p class="text-gray-500 dark:text-gray-400"
            {
                "Nenhuma venda corresponde aos filtros selecionados."
            }
        }
    }
}

/// The filter sidebar.
///
/// The hidden `filtros` field marks the query string as a form submission,
/// which is how an unchecked checkbox is told apart from the initial load.
/// The year slider is only in the form while the period checkbox is off.
fn sidebar_view(selection: &FilterSelection, opcoes_vendedores: &[String]) -> Markup {
    html! {
        aside class="w-full lg:w-72 shrink-0"
        {
            form
                id="filtros-form"
                class="flex flex-col gap-4 p-4 bg-white rounded-lg shadow dark:bg-gray-800"
                hx-get=(endpoints::DASHBOARD_VIEW)
                hx-trigger="change, change from:#qtd-vendedores"
                hx-target="#painel"
                hx-swap="outerHTML"
                hx-push-url="true"
            {
                h2 class="text-lg font-semibold" { "Filtros" }

                input type="hidden" name="filtros" value="1";

                label class="flex flex-col gap-1"
                {
                    span class="text-sm font-medium" { "Região" }
                    select
                        name="regiao"
                        class="rounded border-gray-300 dark:bg-gray-700"
                    {
                        @for regiao in REGIOES {
                            option
                                value=(regiao)
                                selected[regiao == selection.regiao_exibida()]
                            {
                                (regiao)
                            }
                        }
                    }
                }

                label class="flex gap-2 items-center"
                {
                    input
                        type="checkbox"
                        name="todos_periodos"
                        value="1"
                        checked[selection.ano.is_none()];
                    span class="text-sm font-medium" { "Dados de todo o período" }
                }

                @if let Some(ano) = selection.ano {
                    label class="flex flex-col gap-1"
                    {
                        span class="text-sm font-medium" { "Ano: " (ano) }
                        input
                            type="range"
                            name="ano"
                            min=(ANO_MIN)
                            max=(ANO_MAX)
                            value=(ano);
                    }
                }

                label class="flex flex-col gap-1"
                {
                    span class="text-sm font-medium" { "Vendedores" }
                    select
                        name="vendedores"
                        multiple
                        size="6"
                        class="rounded border-gray-300 dark:bg-gray-700"
                    {
                        @for vendedor in opcoes_vendedores {
                            option
                                value=(vendedor)
                                selected[selection.vendedores.contains(vendedor)]
                            {
                                (vendedor)
                            }
                        }
                    }
                }
            }
        }
    }
}

/// The metric callouts repeated at the top of every tab.
fn metricas_view(sales: &[Sale]) -> Markup {
    let receita = receita_total(sales);
    let quantidade = sales.len();

    html! {
        div class="grid grid-cols-1 sm:grid-cols-2 gap-4 mb-4"
        {
            (metric_view(
                "Receita",
                &formata_numero(receita, "R$ "),
                &moeda_completa(receita),
            ))
            (metric_view(
                "Quantidade de vendas",
                &formata_numero(quantidade as f64, ""),
                &contagem_completa(quantidade),
            ))
        }
    }
}

/// The three dashboard tabs with their metrics and charts.
fn tabs_view(selection: &FilterSelection, sales: &[Sale]) -> Markup {
    let estados_receita = receita_por_estado(sales);
    let estados_vendas = vendas_por_estado(sales);
    let vendedores = resumo_vendedores(sales);
    let n = selection.qtd_vendedores;

    let graficos_receita = [
        DashboardChart::new("mapa-receita", mapa_receita(&estados_receita)),
        DashboardChart::new("receita-mensal", linha_receita_mensal(&receita_mensal(sales))),
        DashboardChart::new(
            "receita-estados",
            barras_estados("Top estados (receita)", &estados_receita, TOP_ESTADOS),
        ),
        DashboardChart::new(
            "receita-categorias",
            barras_categorias("Receita por categoria", &receita_por_categoria(sales)),
        ),
    ];

    let graficos_vendas = [
        DashboardChart::new("mapa-vendas", mapa_vendas(&estados_vendas)),
        DashboardChart::new("vendas-mensais", linha_vendas_mensais(&vendas_mensais(sales))),
        DashboardChart::new(
            "vendas-estados",
            barras_estados(
                "Top estados (quantidade de vendas)",
                &estados_vendas,
                TOP_ESTADOS,
            ),
        ),
        DashboardChart::new(
            "vendas-categorias",
            barras_categorias(
                "Quantidade de vendas por categoria",
                &vendas_por_categoria(sales),
            ),
        ),
    ];

    let graficos_vendedores = [
        DashboardChart::new(
            "receita-vendedores",
            barras_vendedores(
                &format!("Top {n} vendedores (receita)"),
                &top_por_receita(&vendedores, n),
                |vendedor| vendedor.receita,
            ),
        ),
        DashboardChart::new(
            "vendas-vendedores",
            barras_vendedores(
                &format!("Top {n} vendedores (quantidade de vendas)"),
                &top_por_vendas(&vendedores, n),
                |vendedor| vendedor.vendas as f64,
            ),
        ),
    ];

    html! {
        nav class="flex gap-2 mb-4 border-b border-gray-300 dark:border-gray-700"
        {
            (tab_button("receita", "Receita", true))
            (tab_button("vendas", "Quantidade de vendas", false))
            (tab_button("vendedores", "Vendedores", false))
        }

        div id="aba-receita" class="aba-painel"
        {
            (metricas_view(sales))
            (charts_view(&graficos_receita))
        }

        div id="aba-vendas" class="aba-painel hidden"
        {
            (metricas_view(sales))
            (charts_view(&graficos_vendas))
        }

        div id="aba-vendedores" class="aba-painel hidden"
        {
            (metricas_view(sales))

            label class="flex gap-2 items-center mb-4"
            {
                span class="text-sm font-medium" { "Quantidade de vendedores" }
                input
                    id="qtd-vendedores"
                    type="number"
                    name="qtd_vendedores"
                    form="filtros-form"
                    min=(QTD_VENDEDORES_MIN)
                    max=(QTD_VENDEDORES_MAX)
                    value=(n)
                    class="w-20 rounded border-gray-300 dark:bg-gray-700";
            }

            (charts_view(&graficos_vendedores))
        }

        (charts_script(&graficos_receita))
        (charts_script(&graficos_vendas))
        (charts_script(&graficos_vendedores))
        (tab_script())
    }
}

fn tab_button(aba: &str, rotulo: &str, ativa: bool) -> Markup {
    let classe_ativa = if ativa {
        "border-blue-600 text-blue-600"
    } else {
        "border-transparent"
    };

    html! {
        button
            type="button"
            id=(format!("botao-{aba}"))
            class=(format!("aba-botao px-4 py-2 border-b-2 font-medium {classe_ativa}"))
            onclick=(format!("mostraAba('{aba}')"))
        {
            (rotulo)
        }
    }
}

/// Tab switching keeps all panels in the DOM and toggles visibility.
/// The resize event makes ECharts lay out charts that were initialized
/// inside a hidden panel.
fn tab_script() -> Markup {
    html! {
        script
        {
            (PreEscaped(
                "function mostraAba(aba) {
                    document.querySelectorAll('.aba-painel')
                        .forEach((painel) => painel.classList.add('hidden'));
                    document.getElementById('aba-' + aba).classList.remove('hidden');

                    document.querySelectorAll('.aba-botao').forEach((botao) => {
                        botao.classList.remove('border-blue-600', 'text-blue-600');
                        botao.classList.add('border-transparent');
                    });
                    const botao = document.getElementById('botao-' + aba);
                    botao.classList.remove('border-transparent');
                    botao.classList.add('border-blue-600', 'text-blue-600');

                    window.dispatchEvent(new Event('resize'));
                }"
            ))
        }
    }
}

#[cfg(test)]
mod dashboard_view_tests {
    use time::macros::date;

    use crate::{
        api::Sale,
        filters::{DashboardParams, FilterSelection},
    };

    use super::{painel_view, sidebar_view, tabs_view};

    fn venda(vendedor: &str, preco: f64) -> Sale {
        Sale {
            produto: "Corda de pular".to_owned(),
            categoria: "esporte e lazer".to_owned(),
            preco,
            data_compra: date!(2022 - 03 - 01),
            vendedor: vendedor.to_owned(),
            local_compra: "SP".to_owned(),
            avaliacao: 4,
            tipo_pagamento: "cartao_credito".to_owned(),
            quantidade: 2,
            lat: -22.19,
            lon: -48.79,
        }
    }

    #[test]
    fn sidebar_marks_the_selected_region() {
        let selection = FilterSelection::from_params(&DashboardParams {
            regiao: Some("Sul".to_owned()),
            ..Default::default()
        });

        let markup = sidebar_view(&selection, &[]).into_string();

        assert!(markup.contains(r#"<option value="Sul" selected>"#));
        assert!(markup.contains(r#"<option value="Norte">"#));
    }

    #[test]
    fn sidebar_hides_the_year_slider_when_showing_all_periods() {
        let selection = FilterSelection::from_params(&DashboardParams::default());

        let markup = sidebar_view(&selection, &[]).into_string();

        assert!(!markup.contains(r#"name="ano""#));
        assert!(markup.contains(r#"name="todos_periodos""#));
    }

    #[test]
    fn sidebar_shows_the_year_slider_when_a_year_is_selected() {
        let selection = FilterSelection::from_params(&DashboardParams {
            filtros: Some(1),
            ano: Some(2022),
            ..Default::default()
        });

        let markup = sidebar_view(&selection, &[]).into_string();

        assert!(markup.contains(r#"name="ano""#));
        assert!(markup.contains(r#"value="2022""#));
    }

    #[test]
    fn sidebar_lists_seller_options_and_marks_selected_ones() {
        let selection = FilterSelection::from_params(&DashboardParams {
            vendedores: vec!["Ana Souza".to_owned()],
            ..Default::default()
        });
        let opcoes = ["Ana Souza".to_owned(), "Beatriz Moraes".to_owned()];

        let markup = sidebar_view(&selection, &opcoes).into_string();

        assert!(markup.contains(r#"<option value="Ana Souza" selected>"#));
        assert!(markup.contains(r#"<option value="Beatriz Moraes">"#));
    }

    #[test]
    fn tabs_contain_metrics_charts_and_the_seller_count_input() {
        let selection = FilterSelection::from_params(&DashboardParams::default());
        let sales = vec![venda("Ana Souza", 1500.0), venda("Beatriz Moraes", 500.0)];

        let markup = tabs_view(&selection, &sales).into_string();

        assert!(markup.contains("R$ 2.00 mil"));
        assert!(markup.contains(r#"id="mapa-receita""#));
        assert!(markup.contains(r#"id="vendas-categorias""#));
        assert!(markup.contains(r#"id="receita-vendedores""#));
        assert!(markup.contains(r#"id="qtd-vendedores""#));
        assert!(markup.contains("Top 5 vendedores"));
    }

    #[test]
    fn empty_data_renders_the_no_data_view_but_keeps_the_sidebar() {
        let selection = FilterSelection::from_params(&DashboardParams::default());

        let markup = painel_view(&selection, &[], &[]).into_string();

        assert!(markup.contains("Nenhuma venda corresponde"));
        assert!(markup.contains(r#"id="filtros-form""#));
        assert!(!markup.contains("echarts.init"));
    }
}
