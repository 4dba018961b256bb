//! Unified symbol forms and their BingX venue spelling
//!
//! Configuration names markets in unified form: `BTC/USDT` for spot and
//! `BTC/USDT:USDT` for the USDT-settled perpetual. BingX itself expects
//! `BTC-USDT` on both product lines.

use crate::config::MarketType;

/// One concrete way to ask the venue for a configured symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolForm {
    /// Unified form, reported back as the resolved symbol
    pub unified: String,
    /// Venue form sent on the wire
    pub venue: String,
    pub market: MarketType,
}

/// Forms to try for `symbol`, most likely first for `market`
pub fn candidate_forms(symbol: &str, market: MarketType) -> Vec<SymbolForm> {
    let symbol = symbol.trim();
    let Some((pair, settle)) = split_pair(symbol) else {
        return vec![SymbolForm {
            unified: symbol.to_string(),
            venue: symbol.to_string(),
            market,
        }];
    };

    let venue = pair.replace('/', "-");
    let spot = SymbolForm {
        unified: pair.to_string(),
        venue: venue.clone(),
        market: MarketType::Spot,
    };
    let swap = SymbolForm {
        unified: format!("{}:{}", pair, settle),
        venue,
        market: MarketType::Swap,
    };

    match market {
        MarketType::Swap => vec![swap, spot],
        MarketType::Spot => vec![spot, swap],
    }
}

/// `BASE/QUOTE[:SETTLE]` into (`BASE/QUOTE`, settle currency)
fn split_pair(symbol: &str) -> Option<(&str, &str)> {
    let (pair, settle) = match symbol.split_once(':') {
        Some((pair, settle)) => (pair, Some(settle)),
        None => (symbol, None),
    };
    let (base, quote) = pair.split_once('/')?;
    if base.is_empty() || quote.is_empty() {
        return None;
    }
    let settle = settle.filter(|s| !s.is_empty()).unwrap_or(quote);
    Some((pair, settle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unified(forms: &[SymbolForm]) -> Vec<&str> {
        forms.iter().map(|f| f.unified.as_str()).collect()
    }

    #[test]
    fn test_swap_prefers_perpetual() {
        let forms = candidate_forms("BTC/USDT", MarketType::Swap);
        assert_eq!(unified(&forms), vec!["BTC/USDT:USDT", "BTC/USDT"]);
        assert_eq!(forms[0].market, MarketType::Swap);
        assert_eq!(forms[1].market, MarketType::Spot);
        assert!(forms.iter().all(|f| f.venue == "BTC-USDT"));
    }

    #[test]
    fn test_spot_prefers_bare_pair() {
        let forms = candidate_forms("ETH/USDT", MarketType::Spot);
        assert_eq!(unified(&forms), vec!["ETH/USDT", "ETH/USDT:USDT"]);
    }

    #[test]
    fn test_perpetual_input_keeps_settle() {
        let forms = candidate_forms("SOL/USDC:USDC", MarketType::Spot);
        assert_eq!(unified(&forms), vec!["SOL/USDC", "SOL/USDC:USDC"]);
        assert_eq!(forms[0].venue, "SOL-USDC");
    }

    #[test]
    fn test_unrecognised_symbol_passes_through() {
        let forms = candidate_forms(" DOGE-USDT ", MarketType::Swap);
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].venue, "DOGE-USDT");
        assert_eq!(forms[0].market, MarketType::Swap);

        assert_eq!(candidate_forms("/USDT", MarketType::Swap).len(), 1);
    }
}
