// src/application/dto/parser.rs
// Parsers for DTOs

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;

use super::{Envelope, HoldingDto, OrderDto, OrderIdData};
use crate::domain::errors::{BrokerError, BrokerResult};
use crate::domain::model::{Holding, OrderId, OrderSummary};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SNIPPET_LEN: usize = 200;

/// Decode a response body into the `data` payload, or classify the failure.
pub fn parse_envelope<T: DeserializeOwned>(http_status: u16, body: &[u8]) -> BrokerResult<T> {
    let envelope: Envelope = match serde_json::from_slice(body) {
        Ok(envelope) => envelope,
        Err(e) => return Err(classify_unparsed(http_status, body, e)),
    };

    if envelope.status == "success" {
        let data = envelope.data.ok_or_else(|| {
            BrokerError::MalformedResponse("success response without data".to_string())
        })?;
        return serde_json::from_value(data)
            .map_err(|e| BrokerError::MalformedResponse(format!("unexpected data shape: {}", e)));
    }

    Err(classify_error(
        http_status,
        envelope.error_type.as_deref(),
        envelope.message.unwrap_or_default(),
    ))
}

/// Map the broker's `error_type` onto the error taxonomy.
pub fn classify_error(http_status: u16, error_type: Option<&str>, message: String) -> BrokerError {
    match error_type {
        Some("TokenException") => BrokerError::Authentication(message),
        Some("NetworkException") => BrokerError::Transport(message),
        Some(kind) => BrokerError::rejected(kind, message),
        None => match http_status {
            401 | 403 => BrokerError::Authentication(message),
            429 | 500..=599 => BrokerError::Transport(format!("HTTP {}: {}", http_status, message)),
            _ => BrokerError::rejected(format!("HTTP {}", http_status), message),
        },
    }
}

fn classify_unparsed(http_status: u16, body: &[u8], cause: serde_json::Error) -> BrokerError {
    let snippet = snippet(body);
    match http_status {
        200..=299 => BrokerError::MalformedResponse(format!("{} in body {:?}", cause, snippet)),
        _ => classify_error(http_status, None, snippet),
    }
}

fn snippet(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();
    match trimmed.char_indices().nth(SNIPPET_LEN) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

pub fn parse_order_id(http_status: u16, body: &[u8]) -> BrokerResult<OrderId> {
    let data: OrderIdData = parse_envelope(http_status, body)?;
    Ok(OrderId(data.order_id))
}

pub fn parse_orders(http_status: u16, body: &[u8]) -> BrokerResult<Vec<OrderSummary>> {
    let orders: Vec<OrderDto> = parse_envelope(http_status, body)?;
    orders.into_iter().map(OrderSummary::try_from).collect()
}

pub fn parse_holdings(http_status: u16, body: &[u8]) -> BrokerResult<Vec<Holding>> {
    let holdings: Vec<HoldingDto> = parse_envelope(http_status, body)?;
    Ok(holdings.into_iter().map(Holding::from).collect())
}

impl TryFrom<OrderDto> for OrderSummary {
    type Error = BrokerError;

    fn try_from(dto: OrderDto) -> Result<Self, Self::Error> {
        let placed_at = dto
            .order_timestamp
            .as_deref()
            .map(|ts| {
                NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).map_err(|e| {
                    BrokerError::MalformedResponse(format!(
                        "Invalid order_timestamp {:?} for order {}: {}",
                        ts, dto.order_id, e
                    ))
                })
            })
            .transpose()?;

        Ok(Self {
            order_id: OrderId(dto.order_id),
            status: dto.status.unwrap_or_default(),
            tradingsymbol: dto.tradingsymbol,
            exchange: dto.exchange,
            transaction_type: dto.transaction_type,
            order_type: dto.order_type,
            product: dto.product,
            variety: dto.variety,
            validity: dto.validity.unwrap_or_default(),
            quantity: dto.quantity,
            filled_quantity: dto.filled_quantity,
            pending_quantity: dto.pending_quantity,
            price: dto.price,
            trigger_price: dto.trigger_price,
            average_price: dto.average_price,
            placed_at,
            status_message: dto.status_message,
            tag: dto.tag,
        })
    }
}

impl From<HoldingDto> for Holding {
    fn from(dto: HoldingDto) -> Self {
        Self {
            tradingsymbol: dto.tradingsymbol,
            exchange: dto.exchange,
            isin: dto.isin,
            product: dto.product,
            quantity: dto.quantity,
            t1_quantity: dto.t1_quantity,
            average_price: dto.average_price,
            last_price: dto.last_price,
            pnl: dto.pnl,
        }
    }
}
