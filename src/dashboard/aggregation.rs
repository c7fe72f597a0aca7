//! Summary tables computed from the fetched sales.
//!
//! Each function takes the filtered sales and produces the rows that one or
//! more charts are drawn from. Ordering is part of the contract: chart bars
//! and map bubbles follow the order produced here.

use std::collections::BTreeMap;

use crate::api::Sale;

/// Portuguese month names, indexed by month number minus one.
pub const MESES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// One state's aggregated value together with its map position.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumoEstado {
    /// The state abbreviation, e.g. "SP".
    pub estado: String,
    /// Latitude of the state, taken from its first sale record.
    pub lat: f64,
    /// Longitude of the state.
    pub lon: f64,
    /// The aggregated value, revenue in BRL or a sale count.
    pub valor: f64,
}

/// One year's monthly values, `None` for months without sales.
#[derive(Debug, Clone, PartialEq)]
pub struct SerieMensal {
    /// The calendar year.
    pub ano: i32,
    /// One slot per month, January first.
    pub valores: [Option<f64>; 12],
}

/// One category's aggregated value.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumoCategoria {
    /// The product category name.
    pub categoria: String,
    /// The aggregated value.
    pub valor: f64,
}

/// One seller's totals.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumoVendedor {
    /// The seller's name.
    pub vendedor: String,
    /// Total revenue in BRL.
    pub receita: f64,
    /// Number of sales.
    pub vendas: usize,
}

/// Total revenue across all sales, in BRL.
pub fn receita_total(sales: &[Sale]) -> f64 {
    sales.iter().map(|sale| sale.preco).sum()
}

/// Revenue per state, highest first.
pub fn receita_por_estado(sales: &[Sale]) -> Vec<ResumoEstado> {
    agrupa_por_estado(sales, |sale| sale.preco)
}

/// Sale counts per state, highest first.
pub fn vendas_por_estado(sales: &[Sale]) -> Vec<ResumoEstado> {
    agrupa_por_estado(sales, |_| 1.0)
}

fn agrupa_por_estado(sales: &[Sale], peso: impl Fn(&Sale) -> f64) -> Vec<ResumoEstado> {
    let mut por_estado: BTreeMap<&str, (f64, f64, f64)> = BTreeMap::new();

    for sale in sales {
        let entrada = por_estado
            .entry(&sale.local_compra)
            // Coordinates come from the state's first record.
            .or_insert((sale.lat, sale.lon, 0.0));
        entrada.2 += peso(sale);
    }

    let mut resumo: Vec<_> = por_estado
        .into_iter()
        .map(|(estado, (lat, lon, valor))| ResumoEstado {
            estado: estado.to_owned(),
            lat,
            lon,
            valor,
        })
        .collect();
    resumo.sort_by(|a, b| {
        b.valor
            .total_cmp(&a.valor)
            .then_with(|| a.estado.cmp(&b.estado))
    });

    resumo
}

/// Monthly revenue per year, in chronological year order.
pub fn receita_mensal(sales: &[Sale]) -> Vec<SerieMensal> {
    agrupa_por_mes(sales, |sale| sale.preco)
}

/// Monthly sale counts per year, in chronological year order.
pub fn vendas_mensais(sales: &[Sale]) -> Vec<SerieMensal> {
    agrupa_por_mes(sales, |_| 1.0)
}

fn agrupa_por_mes(sales: &[Sale], peso: impl Fn(&Sale) -> f64) -> Vec<SerieMensal> {
    let mut por_ano: BTreeMap<i32, [Option<f64>; 12]> = BTreeMap::new();

    for sale in sales {
        let valores = por_ano.entry(sale.data_compra.year()).or_default();
        let mes = sale.data_compra.month() as usize - 1;
        valores[mes] = Some(valores[mes].unwrap_or(0.0) + peso(sale));
    }

    por_ano
        .into_iter()
        .map(|(ano, valores)| SerieMensal { ano, valores })
        .collect()
}

/// Revenue per product category, highest first.
pub fn receita_por_categoria(sales: &[Sale]) -> Vec<ResumoCategoria> {
    agrupa_por_categoria(sales, |sale| sale.preco)
}

/// Sale counts per product category, highest first.
pub fn vendas_por_categoria(sales: &[Sale]) -> Vec<ResumoCategoria> {
    agrupa_por_categoria(sales, |_| 1.0)
}

fn agrupa_por_categoria(sales: &[Sale], peso: impl Fn(&Sale) -> f64) -> Vec<ResumoCategoria> {
    let mut por_categoria: BTreeMap<&str, f64> = BTreeMap::new();

    for sale in sales {
        *por_categoria.entry(&sale.categoria).or_default() += peso(sale);
    }

    let mut resumo: Vec<_> = por_categoria
        .into_iter()
        .map(|(categoria, valor)| ResumoCategoria {
            categoria: categoria.to_owned(),
            valor,
        })
        .collect();
    resumo.sort_by(|a, b| {
        b.valor
            .total_cmp(&a.valor)
            .then_with(|| a.categoria.cmp(&b.categoria))
    });

    resumo
}

/// Every seller's revenue and sale count, in no particular order.
pub fn resumo_vendedores(sales: &[Sale]) -> Vec<ResumoVendedor> {
    let mut por_vendedor: BTreeMap<&str, (f64, usize)> = BTreeMap::new();

    for sale in sales {
        let entrada = por_vendedor.entry(&sale.vendedor).or_default();
        entrada.0 += sale.preco;
        entrada.1 += 1;
    }

    por_vendedor
        .into_iter()
        .map(|(vendedor, (receita, vendas))| ResumoVendedor {
            vendedor: vendedor.to_owned(),
            receita,
            vendas,
        })
        .collect()
}

/// The `n` sellers with the highest revenue, highest first.
///
/// Ties break on the seller's name so the ranking is stable across reruns.
pub fn top_por_receita(vendedores: &[ResumoVendedor], n: usize) -> Vec<ResumoVendedor> {
    let mut ranking = vendedores.to_vec();
    ranking.sort_by(|a, b| {
        b.receita
            .total_cmp(&a.receita)
            .then_with(|| a.vendedor.cmp(&b.vendedor))
    });
    ranking.truncate(n);

    ranking
}

/// The `n` sellers with the most sales, highest first.
pub fn top_por_vendas(vendedores: &[ResumoVendedor], n: usize) -> Vec<ResumoVendedor> {
    let mut ranking = vendedores.to_vec();
    ranking.sort_by(|a, b| {
        b.vendas
            .cmp(&a.vendas)
            .then_with(|| a.vendedor.cmp(&b.vendedor))
    });
    ranking.truncate(n);

    ranking
}

#[cfg(test)]
mod aggregation_tests {
    use time::{Date, Month};

    use crate::api::Sale;

    use super::{
        ResumoVendedor, receita_mensal, receita_por_categoria, receita_por_estado, receita_total,
        resumo_vendedores, top_por_receita, top_por_vendas, vendas_mensais, vendas_por_estado,
    };

    fn venda(estado: &str, categoria: &str, vendedor: &str, preco: f64, ano: i32, mes: u8) -> Sale {
        Sale {
            produto: "Produto".to_owned(),
            categoria: categoria.to_owned(),
            preco,
            data_compra: Date::from_calendar_date(ano, Month::try_from(mes).unwrap(), 15).unwrap(),
            vendedor: vendedor.to_owned(),
            local_compra: estado.to_owned(),
            avaliacao: 4,
            tipo_pagamento: "boleto".to_owned(),
            quantidade: 1,
            lat: match estado {
                "SP" => -22.19,
                "RJ" => -22.25,
                _ => -12.96,
            },
            lon: -48.79,
        }
    }

    #[test]
    fn receita_total_sums_prices() {
        let sales = vec![
            venda("SP", "livros", "Ana Souza", 100.0, 2021, 1),
            venda("RJ", "livros", "Ana Souza", 50.5, 2021, 2),
        ];

        assert_eq!(receita_total(&sales), 150.5);
    }

    #[test]
    fn states_are_sorted_by_value_descending() {
        let sales = vec![
            venda("SP", "livros", "Ana Souza", 100.0, 2021, 1),
            venda("RJ", "livros", "Ana Souza", 300.0, 2021, 1),
            venda("SP", "livros", "Ana Souza", 50.0, 2021, 2),
        ];

        let resumo = receita_por_estado(&sales);

        assert_eq!(resumo.len(), 2);
        assert_eq!(resumo[0].estado, "RJ");
        assert_eq!(resumo[0].valor, 300.0);
        assert_eq!(resumo[1].estado, "SP");
        assert_eq!(resumo[1].valor, 150.0);
    }

    #[test]
    fn state_coordinates_come_from_its_records() {
        let sales = vec![venda("SP", "livros", "Ana Souza", 100.0, 2021, 1)];

        let resumo = vendas_por_estado(&sales);

        assert_eq!(resumo[0].lat, -22.19);
        assert_eq!(resumo[0].lon, -48.79);
    }

    #[test]
    fn tied_states_are_sorted_by_name() {
        let sales = vec![
            venda("SP", "livros", "Ana Souza", 100.0, 2021, 1),
            venda("BA", "livros", "Ana Souza", 100.0, 2021, 1),
        ];

        let resumo = receita_por_estado(&sales);

        assert_eq!(resumo[0].estado, "BA");
        assert_eq!(resumo[1].estado, "SP");
    }

    #[test]
    fn monthly_revenue_groups_by_year_chronologically() {
        let sales = vec![
            venda("SP", "livros", "Ana Souza", 10.0, 2022, 3),
            venda("SP", "livros", "Ana Souza", 20.0, 2021, 3),
            venda("SP", "livros", "Ana Souza", 5.0, 2021, 3),
        ];

        let series = receita_mensal(&sales);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].ano, 2021);
        assert_eq!(series[0].valores[2], Some(25.0));
        assert_eq!(series[0].valores[0], None);
        assert_eq!(series[1].ano, 2022);
        assert_eq!(series[1].valores[2], Some(10.0));
    }

    #[test]
    fn monthly_counts_count_sales_not_revenue() {
        let sales = vec![
            venda("SP", "livros", "Ana Souza", 10.0, 2021, 1),
            venda("SP", "livros", "Ana Souza", 990.0, 2021, 1),
        ];

        let series = vendas_mensais(&sales);

        assert_eq!(series[0].valores[0], Some(2.0));
    }

    #[test]
    fn categories_are_sorted_by_revenue_descending() {
        let sales = vec![
            venda("SP", "livros", "Ana Souza", 10.0, 2021, 1),
            venda("SP", "brinquedos", "Ana Souza", 500.0, 2021, 1),
        ];

        let resumo = receita_por_categoria(&sales);

        assert_eq!(resumo[0].categoria, "brinquedos");
        assert_eq!(resumo[1].categoria, "livros");
    }

    #[test]
    fn seller_summary_tracks_revenue_and_count() {
        let sales = vec![
            venda("SP", "livros", "Ana Souza", 100.0, 2021, 1),
            venda("SP", "livros", "Ana Souza", 200.0, 2021, 2),
            venda("SP", "livros", "Beatriz Moraes", 50.0, 2021, 1),
        ];

        let mut resumo = resumo_vendedores(&sales);
        resumo.sort_by(|a, b| a.vendedor.cmp(&b.vendedor));

        assert_eq!(
            resumo,
            vec![
                ResumoVendedor {
                    vendedor: "Ana Souza".to_owned(),
                    receita: 300.0,
                    vendas: 2,
                },
                ResumoVendedor {
                    vendedor: "Beatriz Moraes".to_owned(),
                    receita: 50.0,
                    vendas: 1,
                },
            ]
        );
    }

    #[test]
    fn top_sellers_take_the_highest_and_break_ties_by_name() {
        let vendedores = vec![
            ResumoVendedor {
                vendedor: "Camila Ribeiro".to_owned(),
                receita: 100.0,
                vendas: 3,
            },
            ResumoVendedor {
                vendedor: "Ana Souza".to_owned(),
                receita: 100.0,
                vendas: 5,
            },
            ResumoVendedor {
                vendedor: "Beatriz Moraes".to_owned(),
                receita: 10.0,
                vendas: 9,
            },
        ];

        let por_receita = top_por_receita(&vendedores, 2);
        assert_eq!(por_receita[0].vendedor, "Ana Souza");
        assert_eq!(por_receita[1].vendedor, "Camila Ribeiro");

        let por_vendas = top_por_vendas(&vendedores, 2);
        assert_eq!(por_vendas[0].vendedor, "Beatriz Moraes");
        assert_eq!(por_vendas[1].vendedor, "Ana Souza");
    }

    #[test]
    fn growing_the_top_n_only_appends_to_the_ranking() {
        let vendedores: Vec<ResumoVendedor> = (0..10)
            .map(|i| ResumoVendedor {
                vendedor: format!("Vendedor {i}"),
                receita: f64::from(100 - i * (i % 3)),
                vendas: 10 - i as usize,
            })
            .collect();

        let cinco = top_por_receita(&vendedores, 5);
        let oito = top_por_receita(&vendedores, 8);

        assert_eq!(cinco[..], oito[..5]);
    }

    #[test]
    fn top_n_larger_than_the_seller_list_returns_everyone() {
        let vendedores = vec![ResumoVendedor {
            vendedor: "Ana Souza".to_owned(),
            receita: 10.0,
            vendas: 1,
        }];

        assert_eq!(top_por_receita(&vendedores, 5).len(), 1);
    }
}
