use colored::Colorize;
use comfy_table::{
    presets::UTF8_FULL, Attribute, Cell, CellAlignment, Color as TColor, ContentArrangement, Table,
};
use piechart::{Chart, Color};

use crate::valuation::{total_value, GainRecord, PricedHolding};

// Print the portfolio as a table
pub fn print_portfolio(rows: &[PricedHolding], currency: &str) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);

    table.set_header(vec![
        Cell::new("Symbol").add_attribute(Attribute::Bold),
        Cell::new("Shares").add_attribute(Attribute::Bold),
        Cell::new(format!("Price ({currency})")).add_attribute(Attribute::Bold),
        Cell::new(format!("Value ({currency})")).add_attribute(Attribute::Bold),
    ]);

    for row in rows {
        let (price_str, value_str) = match row.price {
            Some(price) => (
                format!("{price:.2}"),
                format!("{:.2}", price * row.holding.shares as f64),
            ),
            None => ("-".to_string(), "-".to_string()),
        };

        table.add_row(vec![
            Cell::new(&row.holding.symbol),
            Cell::new(row.holding.shares).set_alignment(CellAlignment::Right),
            Cell::new(price_str).set_alignment(CellAlignment::Right),
            Cell::new(value_str).set_alignment(CellAlignment::Right),
        ]);
    }

    table.add_row(vec![
        Cell::new("TOTAL").add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
        Cell::new(format!("{:.2}", total_value(rows)))
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Bold),
    ]);

    println!("{table}");
}

// Print per-symbol gains/losses with a colored PnL column
pub fn print_gains(records: &[GainRecord], total_delta: f64, currency: &str) {
    if records.is_empty() {
        println!("{}", "No live prices available this round.".yellow());
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);

    table.set_header(vec![
        Cell::new("Symbol").add_attribute(Attribute::Bold),
        Cell::new("Shares").add_attribute(Attribute::Bold),
        Cell::new("Cost Basis").add_attribute(Attribute::Bold),
        Cell::new(format!("Price ({currency})")).add_attribute(Attribute::Bold),
        Cell::new("PnL").add_attribute(Attribute::Bold),
        Cell::new("%").add_attribute(Attribute::Bold),
    ]);

    for record in records {
        let pnl_color = if record.delta >= 0.0 {
            TColor::Green
        } else {
            TColor::Red
        };

        let percent_cell = match record.percent {
            Some(percent) => Cell::new(format!("{percent:.2}%"))
                .set_alignment(CellAlignment::Right)
                .fg(pnl_color),
            // percentage is undefined when nothing was invested
            None => Cell::new("-").set_alignment(CellAlignment::Right),
        };

        table.add_row(vec![
            Cell::new(&record.symbol),
            Cell::new(record.shares).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", record.cost_basis)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", record.price)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", record.delta))
                .set_alignment(CellAlignment::Right)
                .fg(pnl_color),
            percent_cell,
        ]);
    }

    let total_color = if total_delta >= 0.0 {
        TColor::Green
    } else {
        TColor::Red
    };
    table.add_row(vec![
        Cell::new("TOTAL").add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(format!("{total_delta:.2}"))
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Bold)
            .fg(total_color),
        Cell::new(""),
    ]);

    println!("{table}");
}

/// Chart slices for the symbols a price came back for. Unpriced symbols
/// are omitted, consistent with how the aggregates treat them.
pub fn chart_data(rows: &[PricedHolding]) -> Vec<piechart::Data> {
    let colors = [
        Color::Red,
        Color::Green,
        Color::Blue,
        Color::Yellow,
        Color::Cyan,
        Color::White,
        Color::Purple,
        Color::Black,
    ];

    let mut data = vec![];
    for row in rows {
        let Some(price) = row.price else { continue };
        let value = price * row.holding.shares as f64;

        data.push(piechart::Data {
            label: row.holding.symbol.clone(),
            value: value as f32,
            color: Some(colors[data.len() % colors.len()].into()),
            fill: '•',
        });
    }
    data
}

pub fn draw_pie_chart(rows: &[PricedHolding]) {
    let data = chart_data(rows);
    if data.is_empty() {
        println!("{}", "No live prices available to chart.".yellow());
        return;
    }

    Chart::new()
        .legend(true)
        .radius(9)
        .aspect_ratio(3)
        .draw(&data);

    print_distribution(rows);
}

// Print the distribution in descending order %-wise
fn print_distribution(rows: &[PricedHolding]) {
    let total = total_value(rows);
    if total <= 0.0 {
        return;
    }

    let mut shares_of_total: Vec<(&str, f64)> = rows
        .iter()
        .filter_map(|row| {
            row.price.map(|price| {
                let value = price * row.holding.shares as f64;
                (row.holding.symbol.as_str(), value / total * 100.0)
            })
        })
        .collect();
    shares_of_total.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());

    println!("====================================");
    for (symbol, percentage) in shares_of_total {
        println!("{symbol: >12} | {percentage: >10.2}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::Holding;

    fn priced(symbol: &str, shares: u64, price: Option<f64>) -> PricedHolding {
        PricedHolding {
            holding: Holding {
                symbol: symbol.to_string(),
                shares,
                cost_basis: 1.0,
            },
            price,
        }
    }

    #[test]
    fn test_chart_data_skips_unpriced_symbols() {
        let rows = vec![
            priced("AAPL", 10, Some(160.0)),
            priced("NOPE", 5, None),
            priced("MSFT", 2, Some(100.0)),
        ];

        let data = chart_data(&rows);
        let labels: Vec<_> = data.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["AAPL", "MSFT"]);
        assert_eq!(data[0].value, 1600.0);
        assert_eq!(data[1].value, 200.0);
    }

    #[test]
    fn test_chart_data_for_no_rows_is_empty() {
        assert!(chart_data(&[]).is_empty());
    }
}
