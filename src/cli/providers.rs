use super::ui;
use crate::core::payment::{FieldType, PaymentProvider};
use crate::core::registry::ProviderRegistry;
use anyhow::Result;
use comfy_table::{Cell, Table};

fn field_type_label(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::String => "string",
        FieldType::Secret => "secret",
        FieldType::Number => "number",
        FieldType::Select => "select",
    }
}

fn schema_table(provider: &dyn PaymentProvider) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Field"),
        ui::header_cell("Label"),
        ui::header_cell("Type"),
        ui::header_cell("Required"),
        ui::header_cell("Default / Options"),
    ]);

    for (name, field) in provider.config_schema() {
        let choices = match (&field.default, &field.options) {
            (Some(default), Some(options)) => format!("{default} ({})", options.join(", ")),
            (Some(default), None) => default.clone(),
            (None, Some(options)) => options.join(", "),
            (None, None) => String::new(),
        };
        table.add_row(vec![
            Cell::new(name),
            Cell::new(&field.label),
            Cell::new(field_type_label(field.field_type)),
            Cell::new(if field.required { "yes" } else { "no" }),
            Cell::new(choices),
        ]);
    }
    table
}

pub fn run(registry: &ProviderRegistry) -> Result<()> {
    let providers = registry.get_all();
    for (i, provider) in providers.iter().enumerate() {
        println!(
            "{} {}\n",
            ui::style_text(provider.name(), ui::StyleType::Title),
            ui::style_text(
                &format!("[{} · {}]", provider.id(), provider.method_type()),
                ui::StyleType::Subtle
            )
        );
        println!("{}", schema_table(provider.as_ref()));
        if i < providers.len() - 1 {
            ui::print_separator();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::converter::{TokenConverter, shared};
    use crate::providers::{CeloProvider, LightningProvider};

    #[test]
    fn test_schema_table() {
        let provider = CeloProvider::new(shared(TokenConverter::default()));
        let rendered = schema_table(&provider).to_string();

        assert!(rendered.contains("walletAddress"));
        assert!(rendered.contains("mainnet (mainnet, alfajores)"));
        assert!(rendered.contains("select"));
    }

    #[test]
    fn test_schema_table_lists_fields_in_declaration_order() {
        let provider = LightningProvider::new(shared(TokenConverter::default()));
        let rendered = schema_table(&provider).to_string();

        let node_url = rendered.find("nodeUrl").unwrap();
        let macaroon = rendered.find("macaroon").unwrap();
        assert!(node_url < macaroon);
    }
}
