use super::ui;
use crate::core::converter::{ConversionResult, SharedConverter, read};
use anyhow::Result;
use comfy_table::{Attribute, Cell, Color};

fn result_table(result: &ConversionResult) -> comfy_table::Table {
    let mut table = ui::new_styled_table();
    table.add_row(vec![
        Cell::new("You send"),
        ui::number_cell(format!("{} {}", result.from_amount, result.from_token)),
    ]);
    table.add_row(vec![
        Cell::new("Gas fee"),
        ui::number_cell(format!("-{} {}", result.gas_fee, result.gas_fee_token)).fg(Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Net amount"),
        ui::number_cell(format!("{} {}", result.net_amount, result.from_token)),
    ]);
    table.add_row(vec![
        Cell::new("You receive").add_attribute(Attribute::Bold),
        ui::number_cell(format!("{} {}", result.to_amount, result.to_token))
            .add_attribute(Attribute::Bold)
            .fg(Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("Exchange rate"),
        ui::number_cell(format!(
            "1 {} = {:.8} {}",
            result.from_token, result.exchange_rate, result.to_token
        )),
    ]);
    table
}

pub fn run(
    converter: &SharedConverter,
    amount: f64,
    from: &str,
    to: &str,
    include_gas_fee: bool,
) -> Result<()> {
    let result = read(converter).convert(amount, from, to, include_gas_fee)?;
    println!(
        "{}\n",
        ui::style_text(&format!("{from} → {to}"), ui::StyleType::Title)
    );
    println!("{}", result_table(&result));
    if !include_gas_fee {
        println!(
            "{}",
            ui::style_text("Gas fee not deducted", ui::StyleType::Subtle)
        );
    }
    Ok(())
}
