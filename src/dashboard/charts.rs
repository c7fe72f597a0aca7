//! Chart generation and rendering for the dashboard.
//!
//! This module creates the interactive ECharts visualizations for the sales
//! data:
//! - **Bubble maps**: revenue and sale counts per state, positioned by the
//!   state coordinates carried on each record
//! - **Monthly lines**: one line per year, revenue or sale counts
//! - **Bar charts**: top states, product categories and top sellers
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization
//! code. The initialization script lives inside the swappable page content so
//! that it runs again after every htmx swap.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    datatype::DataPoint,
    element::{
        AxisLabel, AxisType, ItemStyle, JsFunction, Label, LabelPosition, LineStyle, LineStyleType,
        Tooltip, Trigger,
    },
    series::{Bar, Line, Scatter},
};
use maud::{Markup, PreEscaped, html};

use crate::dashboard::aggregation::{
    MESES, ResumoCategoria, ResumoEstado, ResumoVendedor, SerieMensal,
};

/// Line colors assigned to years, 2020 first.
const CORES_ANO: [&str; 4] = ["#5470c6", "#91cc75", "#fac858", "#ee6666"];

/// Dash patterns cycled alongside the colors so years stay distinguishable.
const TRACOS_ANO: [LineStyleType; 3] =
    [LineStyleType::Solid, LineStyleType::Dashed, LineStyleType::Dotted];

/// The largest bubble diameter on the maps, in pixels.
const BOLHA_MAX: f64 = 48.0;

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

impl DashboardChart {
    pub(super) fn new(id: &'static str, chart: Chart) -> Self {
        Self {
            id,
            options: chart.to_string(),
        }
    }
}

/// Renders the HTML containers for one tab's charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
        {
            @for chart in charts {
                div
                    id=(chart.id)
                    class="min-h-[380px] rounded bg-white dark:bg-gray-100"
                {}
            }
        }
    )
}

/// Generates JavaScript initialization code for the dashboard charts.
///
/// The script runs immediately when inserted, not on DOMContentLoaded, so
/// that htmx swaps re-initialize the charts. Charts inside hidden tab panels
/// render at zero size, so a resize listener keeps them usable after the
/// panel is revealed.
pub(super) fn charts_script(charts: &[DashboardChart]) -> Markup {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', () => chart.resize());
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    html!( script { (PreEscaped(script_content)) } )
}

/// The revenue-per-state bubble map.
pub(super) fn mapa_receita(resumo: &[ResumoEstado]) -> Chart {
    mapa_estados("Receita por estado", resumo, moeda_formatter())
}

/// The sales-per-state bubble map.
pub(super) fn mapa_vendas(resumo: &[ResumoEstado]) -> Chart {
    mapa_estados("Quantidade de vendas por estado", resumo, contagem_formatter())
}

/// A bubble map over lat/lon axes, one series per state so each bubble gets
/// its own scalar symbol size.
fn mapa_estados(titulo: &str, resumo: &[ResumoEstado], formato: JsFunction) -> Chart {
    let maior_valor = resumo
        .iter()
        .map(|estado| estado.valor)
        .fold(f64::MIN, f64::max)
        .max(1.0);

    let mut chart = Chart::new()
        .title(Title::new().text(titulo))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(formato),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(eixo_geografico(resumo.iter().map(|estado| estado.lon)))
        .y_axis(eixo_geografico(resumo.iter().map(|estado| estado.lat)));

    for estado in resumo {
        chart = chart.series(
            Scatter::new()
                .name(&estado.estado)
                .symbol_size(tamanho_bolha(estado.valor, maior_valor))
                .data(vec![vec![estado.lon, estado.lat, estado.valor]]),
        );
    }

    chart
}

/// A value axis padded around the given coordinates, with labels hidden
/// since raw degrees mean little to the reader.
fn eixo_geografico(coordenadas: impl Iterator<Item = f64>) -> Axis {
    let (mut menor, mut maior) = (f64::MAX, f64::MIN);
    for coordenada in coordenadas {
        menor = menor.min(coordenada);
        maior = maior.max(coordenada);
    }

    Axis::new()
        .type_(AxisType::Value)
        .min((menor - 5.0).round())
        .max((maior + 5.0).round())
        .axis_label(AxisLabel::new().show(false))
}

/// Bubble diameter proportional to the square root of the value, so bubble
/// area tracks the value.
fn tamanho_bolha(valor: f64, maior_valor: f64) -> f64 {
    (valor / maior_valor).sqrt() * BOLHA_MAX + 4.0
}

/// The monthly revenue line chart, one line per year.
pub(super) fn linha_receita_mensal(series: &[SerieMensal]) -> Chart {
    let rotulos = (1..=12).map(|mes| mes.to_string()).collect();

    linhas_mensais("Receita mensal", rotulos, series, moeda_formatter())
}

/// The monthly sale count line chart, one line per year.
pub(super) fn linha_vendas_mensais(series: &[SerieMensal]) -> Chart {
    let rotulos = MESES.iter().map(|mes| (*mes).to_owned()).collect();

    linhas_mensais(
        "Quantidade de vendas mensal",
        rotulos,
        series,
        contagem_formatter(),
    )
}

fn linhas_mensais(
    titulo: &str,
    rotulos: Vec<String>,
    series: &[SerieMensal],
    formato: JsFunction,
) -> Chart {
    let maior_valor = series
        .iter()
        .flat_map(|serie| serie.valores.iter().flatten())
        .fold(0.0_f64, |maior, valor| maior.max(*valor));

    let mut chart = Chart::new()
        .title(Title::new().text(titulo))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .value_formatter(formato),
        )
        .legend(Legend::new().top("8%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top("20%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(rotulos),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .min(0.0)
                .max(maior_valor),
        );

    for (indice, serie) in series.iter().enumerate() {
        let cor = CORES_ANO[indice % CORES_ANO.len()];
        let traco = TRACOS_ANO[indice % TRACOS_ANO.len()].clone();

        chart = chart.series(
            Line::new()
                .name(serie.ano.to_string())
                .item_style(ItemStyle::new().color(cor))
                .line_style(LineStyle::new().color(cor).type_(traco))
                .data(
                    serie
                        .valores
                        .iter()
                        // ECharts treats "-" as a missing point, leaving a gap.
                        .map(|valor| match valor {
                            Some(valor) => DataPoint::from(*valor),
                            None => DataPoint::from("-"),
                        })
                        .collect::<Vec<_>>(),
                ),
        );
    }

    chart
}

/// A vertical bar chart of the top states.
pub(super) fn barras_estados(titulo: &str, resumo: &[ResumoEstado], top: usize) -> Chart {
    let top_estados = &resumo[..resumo.len().min(top)];
    let rotulos: Vec<String> = top_estados
        .iter()
        .map(|estado| estado.estado.clone())
        .collect();
    let valores: Vec<f64> = top_estados.iter().map(|estado| estado.valor).collect();

    barras_verticais(titulo, rotulos, valores)
}

/// A vertical bar chart of every product category.
pub(super) fn barras_categorias(titulo: &str, resumo: &[ResumoCategoria]) -> Chart {
    let rotulos: Vec<String> = resumo
        .iter()
        .map(|categoria| categoria.categoria.clone())
        .collect();
    let valores: Vec<f64> = resumo.iter().map(|categoria| categoria.valor).collect();

    barras_verticais(titulo, rotulos, valores)
}

fn barras_verticais(titulo: &str, rotulos: Vec<String>, valores: Vec<f64>) -> Chart {
    Chart::new()
        .title(Title::new().text(titulo))
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(rotulos),
        )
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(
            Bar::new()
                .label(Label::new().show(true).position(LabelPosition::Top))
                .data(valores),
        )
}

/// A horizontal bar chart of the top sellers, biggest bar on top.
pub(super) fn barras_vendedores(
    titulo: &str,
    ranking: &[ResumoVendedor],
    valor: impl Fn(&ResumoVendedor) -> f64,
) -> Chart {
    // The category axis draws bottom-up, so reverse to put the top seller
    // at the top of the chart.
    let rotulos: Vec<String> = ranking
        .iter()
        .rev()
        .map(|vendedor| vendedor.vendedor.clone())
        .collect();
    let valores: Vec<f64> = ranking.iter().rev().map(valor).collect();

    Chart::new()
        .title(Title::new().text(titulo))
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .grid(
            Grid::new()
                .left("3%")
                .right("8%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Value))
        .y_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(rotulos),
        )
        .series(
            Bar::new()
                .label(Label::new().show(true).position(LabelPosition::Right))
                .data(valores),
        )
}

#[inline]
fn moeda_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('pt-BR', {
              style: 'currency',
              currency: 'BRL'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

#[inline]
fn contagem_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "return (number) ? new Intl.NumberFormat('pt-BR').format(number) : \"-\";",
    )
}
