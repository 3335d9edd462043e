//! Currency formatting
//!
//! Reports treat formatting as an opaque collaborator behind
//! `CurrencyFormatter`. The shipped `SymbolFormatter` prefixes a symbol for
//! well-known ISO codes and falls back to "<amount> <CODE>".

use crate::models::Money;

/// Turns an amount into display text for a currency
pub trait CurrencyFormatter: Send + Sync {
    fn format(&self, amount: Money, currency_code: &str) -> String;
}

/// Symbol-prefix formatter for common currencies
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolFormatter;

impl SymbolFormatter {
    fn symbol(code: &str) -> Option<&'static str> {
        match code.to_ascii_uppercase().as_str() {
            "USD" | "CAD" | "AUD" | "NZD" | "SGD" | "HKD" | "MXN" => Some("$"),
            "EUR" => Some("€"),
            "GBP" => Some("£"),
            "JPY" | "CNY" => Some("¥"),
            "INR" => Some("₹"),
            "KRW" => Some("₩"),
            "BRL" => Some("R$"),
            "CHF" => Some("CHF "),
            _ => None,
        }
    }
}

impl CurrencyFormatter for SymbolFormatter {
    fn format(&self, amount: Money, currency_code: &str) -> String {
        match Self::symbol(currency_code) {
            Some(symbol) => amount.format_with_symbol(symbol),
            None => format!("{} {}", amount, currency_code.to_ascii_uppercase()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_symbols() {
        let f = SymbolFormatter;
        assert_eq!(f.format(Money::from_cents(1050), "USD"), "$10.50");
        assert_eq!(f.format(Money::from_cents(1050), "eur"), "€10.50");
        assert_eq!(f.format(Money::from_cents(-1050), "GBP"), "-£10.50");
    }

    #[test]
    fn test_unknown_code_falls_back() {
        assert_eq!(SymbolFormatter.format(Money::from_cents(99), "sek"), "0.99 SEK");
    }
}
