use chrono::{DateTime, Utc};

use crate::db::models::Trigger;
use crate::db::store::TriggerStore;
use crate::db::timestamp;
use crate::error::AppError;
use crate::validation::{require_response_text, require_trigger_text};

struct DemoTrigger {
    trigger_text: &'static str,
    response_text: &'static str,
    is_active: bool,
    usage_count: i64,
    created_at: &'static str,
    last_used: Option<&'static str>,
}

const DEMO_TRIGGERS: &[DemoTrigger] = &[
    DemoTrigger {
        trigger_text: "#PEDIDO123",
        response_text: "Olá! Seu pedido #123 está sendo preparado e será entregue em até 30 minutos. Obrigado pela preferência!",
        is_active: true,
        usage_count: 15,
        created_at: "2024-01-15T10:30:00Z",
        last_used: Some("2024-05-20T14:22:00Z"),
    },
    DemoTrigger {
        trigger_text: "#SUPORTE",
        response_text: "Olá! Recebi sua mensagem e nossa equipe de suporte entrará em contato em até 1 hora.",
        is_active: true,
        usage_count: 8,
        created_at: "2024-02-10T09:15:00Z",
        last_used: Some("2024-05-21T11:45:00Z"),
    },
    DemoTrigger {
        trigger_text: "#HORARIO",
        response_text: "Nosso horário de funcionamento:\n\nSegunda a Sexta: 9h às 18h\nSábado: 9h às 14h\nDomingo: Fechado",
        is_active: true,
        usage_count: 23,
        created_at: "2024-03-05T16:20:00Z",
        last_used: Some("2024-05-22T08:30:00Z"),
    },
    DemoTrigger {
        trigger_text: "#CARDAPIO",
        response_text: "Confira nosso cardápio completo em: www.exemplo.com/cardapio",
        is_active: false,
        usage_count: 5,
        created_at: "2024-04-12T13:10:00Z",
        last_used: None,
    },
];

fn parse_demo_time(value: &str) -> Result<String, AppError> {
    let parsed = DateTime::parse_from_rfc3339(value)
        .map_err(|e| AppError::Internal(format!("bad demo timestamp {value}: {e}")))?;
    Ok(timestamp(parsed.with_timezone(&Utc)))
}

/// Populate an empty store with sample triggers. Returns how many were inserted.
pub async fn seed_demo_triggers(store: &dyn TriggerStore) -> Result<usize, AppError> {
    if !store.list(false).await?.is_empty() {
        tracing::debug!("Store already has triggers, skipping demo seed");
        return Ok(0);
    }

    for demo in DEMO_TRIGGERS {
        let trigger = Trigger {
            id: uuid::Uuid::new_v4().to_string(),
            trigger_text: require_trigger_text(demo.trigger_text)?,
            response_text: require_response_text(demo.response_text)?,
            is_active: demo.is_active,
            usage_count: demo.usage_count,
            created_at: parse_demo_time(demo.created_at)?,
            last_used: demo.last_used.map(parse_demo_time).transpose()?,
        };
        store.insert(trigger).await?;
    }

    tracing::info!(
        count = DEMO_TRIGGERS.len(),
        backend = store.backend_name(),
        "Demo triggers seeded"
    );
    Ok(DEMO_TRIGGERS.len())
}
