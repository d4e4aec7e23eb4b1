//! WhatsApp order messages.
//!
//! Checkout is a hand-off: the cart (or a single product) is rendered as a
//! plain-text summary and opened in WhatsApp through a `wa.me` deep link.
//! Composition is total; unknown currencies fall back to plain numbers.

use foxsports_core::{DEFAULT_CURRENCY, Product, format_currency};

use crate::cart::CartLine;

/// Intro used when no other intro applies.
pub const DEFAULT_INTRO: &str = "Hola, quiero comprar:";

/// Intro for checking out the whole cart.
pub const CART_CHECKOUT_INTRO: &str = "Hola, quiero confirmar este pedido:";

/// Intro for buying a single available product.
pub const BUY_INTRO: &str = "Hola, me interesa la siguiente pieza:";

/// Intro for reserving a product that is not released yet.
pub const RESERVE_INTRO: &str = "Hola, quiero reservar la siguiente pieza:";

/// Site line used when none is configured.
pub const DEFAULT_SITE_URL: &str = "https://foxsportscards.pages.dev";

/// One line of an order message.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub title: String,
    pub qty: u32,
    pub price: f64,
    /// Falls back to the first line that has one.
    pub currency: Option<String>,
    pub slug: Option<String>,
}

impl From<&CartLine> for OrderLine {
    fn from(line: &CartLine) -> Self {
        Self {
            title: line.product.title.clone(),
            qty: line.qty,
            price: line.product.price,
            currency: Some(line.product.currency.clone()),
            slug: Some(line.product.slug.to_string()),
        }
    }
}

impl From<&Product> for OrderLine {
    fn from(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            qty: 1,
            price: product.price,
            currency: Some(product.currency.clone()),
            slug: Some(product.slug.to_string()),
        }
    }
}

/// Optional overrides for the message body.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderOptions<'a> {
    pub intro_message: Option<&'a str>,
    pub site_url: Option<&'a str>,
}

/// Which single-product link a product page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductLinkMode {
    Buy,
    Reserve,
}

impl ProductLinkMode {
    /// Reserve while the product is locked, buy otherwise.
    #[must_use]
    pub const fn for_lock(is_purchase_locked: bool) -> Self {
        if is_purchase_locked { Self::Reserve } else { Self::Buy }
    }

    /// Intro line for `product` in this mode.
    #[must_use]
    pub fn intro(self, product: &Product) -> &str {
        match self {
            Self::Reserve => RESERVE_INTRO,
            Self::Buy => product.whatsapp_message.as_deref().unwrap_or(BUY_INTRO),
        }
    }

    /// Button label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Buy => "Comprar por WhatsApp",
            Self::Reserve => "Reservar por WhatsApp",
        }
    }
}

/// Compose the plain-text order summary, or `None` when there are no lines.
#[must_use]
pub fn compose_order_message(lines: &[OrderLine], options: OrderOptions<'_>) -> Option<String> {
    if lines.is_empty() {
        return None;
    }

    let fallback_currency = lines
        .iter()
        .find_map(|line| line.currency.as_deref())
        .unwrap_or(DEFAULT_CURRENCY);

    let formatted: Vec<String> = lines
        .iter()
        .map(|line| {
            let currency = line.currency.as_deref().unwrap_or(fallback_currency);
            let subtotal = f64::from(line.qty) * line.price;
            format!(
                "• {}x {} – {}",
                line.qty,
                line.title,
                format_currency(subtotal, currency)
            )
        })
        .collect();

    let total: f64 = lines
        .iter()
        .map(|line| f64::from(line.qty) * line.price)
        .sum();

    Some(format!(
        "{}\n{}\nTotal estimado: {}\nSitio: {}",
        options.intro_message.unwrap_or(DEFAULT_INTRO),
        formatted.join("\n"),
        format_currency(total, fallback_currency),
        options.site_url.unwrap_or(DEFAULT_SITE_URL),
    ))
}

/// Build a deep link `https://{host}/{number}?text=…`.
///
/// The `text` parameter is omitted entirely when there are no lines.
#[must_use]
pub fn build_whatsapp_url(
    host: &str,
    number: &str,
    lines: &[OrderLine],
    options: OrderOptions<'_>,
) -> String {
    let base = format!("https://{host}/{number}");
    match compose_order_message(lines, options) {
        Some(body) => format!("{base}?text={}", urlencoding::encode(&body)),
        None => base,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::product;

    fn line(title: &str, qty: u32, price: f64, currency: Option<&str>) -> OrderLine {
        OrderLine {
            title: title.to_string(),
            qty,
            price,
            currency: currency.map(str::to_string),
            slug: None,
        }
    }

    #[test]
    fn test_order_message_lines_and_total() {
        let lines = [
            line("Card A", 2, 500.0, Some("DOP")),
            line("Card B", 1, 1500.0, Some("DOP")),
        ];
        let options = OrderOptions {
            intro_message: Some("Hola"),
            site_url: Some("https://foxsportscards.pages.dev"),
        };

        let body = compose_order_message(&lines, options).unwrap();
        assert_eq!(
            body,
            "Hola\n\
             • 2x Card A – RD$1,000\n\
             • 1x Card B – RD$1,500\n\
             Total estimado: RD$2,500\n\
             Sitio: https://foxsportscards.pages.dev"
        );
        assert!(body.contains(&format!("• 2x Card A – {}", format_currency(1000.0, "DOP"))));
        assert!(body.contains(&format!("Total estimado: {}", format_currency(2500.0, "DOP"))));
    }

    #[test]
    fn test_defaults_when_no_options() {
        let body = compose_order_message(&[line("Card", 1, 10.0, None)], OrderOptions::default())
            .unwrap();
        assert!(body.starts_with("Hola, quiero comprar:\n"));
        assert!(body.ends_with("Sitio: https://foxsportscards.pages.dev"));
        assert!(body.contains("• 1x Card – RD$10"));
    }

    #[test]
    fn test_fallback_currency_is_first_specified() {
        let lines = [
            line("No currency", 1, 10.0, None),
            line("Dollars", 1, 20.0, Some("USD")),
        ];
        let body = compose_order_message(&lines, OrderOptions::default()).unwrap();
        assert!(body.contains("• 1x No currency – US$10"));
        assert!(body.contains("Total estimado: US$30"));
    }

    #[test]
    fn test_unknown_currency_degrades() {
        let body = compose_order_message(
            &[line("Mystery", 1, 100.0, Some("XXX-invalid"))],
            OrderOptions::default(),
        )
        .unwrap();
        assert!(body.contains("• 1x Mystery – XXX-invalid 100"));
    }

    #[test]
    fn test_empty_lines_give_bare_link() {
        let url = build_whatsapp_url("wa.me", "18492617328", &[], OrderOptions::default());
        assert_eq!(url, "https://wa.me/18492617328");
        assert!(compose_order_message(&[], OrderOptions::default()).is_none());
    }

    #[test]
    fn test_url_encodes_body() {
        let url = build_whatsapp_url(
            "wa.me",
            "18492617328",
            &[line("Card A & B", 1, 500.0, Some("DOP"))],
            OrderOptions {
                intro_message: Some("Hola"),
                site_url: Some("https://example.com"),
            },
        );

        let (base, query) = url.split_once("?text=").unwrap();
        assert_eq!(base, "https://wa.me/18492617328");
        assert!(!query.contains(' '));
        assert!(!query.contains('&'));
        assert!(query.starts_with("Hola%0A%E2%80%A2%201x%20Card%20A%20%26%20B"));
        assert_eq!(
            urlencoding::decode(query).unwrap(),
            compose_order_message(
                &[line("Card A & B", 1, 500.0, Some("DOP"))],
                OrderOptions {
                    intro_message: Some("Hola"),
                    site_url: Some("https://example.com"),
                },
            )
            .unwrap()
        );
    }

    #[test]
    fn test_product_link_modes() {
        let mut card = product("luka", "Luka");
        assert_eq!(ProductLinkMode::for_lock(false), ProductLinkMode::Buy);
        assert_eq!(ProductLinkMode::Buy.intro(&card), BUY_INTRO);
        assert_eq!(ProductLinkMode::for_lock(true).intro(&card), RESERVE_INTRO);

        card.whatsapp_message = Some("¿Sigue disponible?".to_string());
        assert_eq!(ProductLinkMode::Buy.intro(&card), "¿Sigue disponible?");
        assert_eq!(ProductLinkMode::Reserve.intro(&card), RESERVE_INTRO);
    }

    #[test]
    fn test_order_line_from_cart_line() {
        let cart_line = CartLine {
            product: product("a", "A"),
            qty: 3,
        };
        let line = OrderLine::from(&cart_line);
        assert_eq!(line.qty, 3);
        assert_eq!(line.currency.as_deref(), Some("DOP"));
        assert_eq!(line.slug.as_deref(), Some("a"));
    }
}
