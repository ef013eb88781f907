use cdcp_flows::{FlowRegistry, FlowType, StepResponse};
use log::info;
use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;
use wizard_state::stubs::{InMemorySession, InMemoryStateStore};
use wizard_state::{FormData, StateStore, WizardConfig};

/// Pequeño menú interactivo para recorrer los asistentes del portal
/// (solicitud y renovación) contra el almacén configurado.
///
/// Con `WIZARD_DB_URL` (o `DATABASE_URL`) definida los estados se guardan
/// en SQLite; si no, en memoria. La sesión del navegador se simula en
/// memoria durante toda la ejecución.
fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    let config = WizardConfig::from_env()?;

    if std::env::var(wizard_persistence::ENV_DB_URL).is_ok() || std::env::var(wizard_persistence::ENV_DATABASE_URL).is_ok() {
        let store = wizard_persistence::new_from_env(config.state_ttl)?;
        info!("usando almacén SQLite");
        run(FlowRegistry::new(Arc::new(store), config))
    } else {
        let store = match config.state_ttl {
            Some(ttl) => InMemoryStateStore::with_ttl(ttl),
            None => InMemoryStateStore::new(),
        };
        info!("usando almacén en memoria");
        run(FlowRegistry::new(Arc::new(store), config))
    }
}

/// Posición actual del usuario dentro de un flujo.
struct Cursor {
    flow: FlowType,
    id: String,
    step: String,
}

// "/{lang}/{flow}/{id}/{step}" -> (id, step)
fn parse_step_url(url: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = url.trim_matches('/').split('/').collect();
    match parts.as_slice() {
        [_, _, id, step] => Some((id.to_string(), step.to_string())),
        _ => None,
    }
}

// `/{lang}/{flow}/{salida}`: página fuera del flujo que conserva el estado.
fn is_exit_url(url: &str) -> bool {
    url.trim_matches('/').split('/').count() == 3
}

fn run<S: StateStore>(registry: FlowRegistry<S>) -> Result<(), Box<dyn Error>> {
    let session = InMemorySession::new();
    let locale = registry.engine().config().default_locale;
    let mut cursor: Option<Cursor> = None;

    loop {
        println!("\n== Asistente CDCP ==");
        if let Some(c) = &cursor {
            println!("(flujo '{}', estado {}, paso '{}')", c.flow, c.id, c.step);
        }
        println!("1) Iniciar solicitud (apply)");
        println!("2) Iniciar renovación (renew)");
        println!("3) Enviar paso actual");
        println!("4) Ver estado");
        println!("5) Modificar un paso");
        println!("6) Abandonar flujo");
        println!("7) Purgar estados expirados");
        println!("8) Salir");
        let choice = prompt("Elige una opción: ")?;
        match choice.trim() {
            "1" | "2" => {
                let flow = if choice.trim() == "1" { FlowType::Apply } else { FlowType::Renew };
                let resp = registry.handler(flow)?.start(&session, locale)?;
                cursor = follow(flow, None, resp);
            }
            "3" => {
                let Some(c) = &cursor else {
                    println!("No hay flujo en curso");
                    continue;
                };
                println!("Campos del paso '{}' (campo=valor, línea vacía para terminar):", c.step);
                let raw = read_form()?;
                let resp = registry.handler(c.flow)?.submit_step(&session, locale, &c.id, &c.step, &raw)?;
                let flow = c.flow;
                let current = Some((c.id.clone(), c.step.clone()));
                cursor = follow(flow, current, resp);
            }
            "4" => {
                let Some(c) = &cursor else {
                    println!("No hay flujo en curso");
                    continue;
                };
                match registry.engine().load_state(&session, c.flow.as_str(), &c.id) {
                    Ok(state) => println!("{}", serde_json::to_string_pretty(&state)?),
                    Err(e) => eprintln!("Error cargando estado: {}", e),
                }
            }
            "5" => {
                let Some(c) = &cursor else {
                    println!("No hay flujo en curso");
                    continue;
                };
                let step = prompt("Paso a modificar: ")?;
                let flow = c.flow;
                let resp = registry.handler(flow)?.edit_step(&session, locale, &c.id, step.trim())?;
                cursor = follow(flow, None, resp);
            }
            "6" => {
                if let Some(c) = cursor.take() {
                    registry.handler(c.flow)?.abandon(&session, locale)?;
                    println!("Flujo '{}' abandonado", c.flow);
                }
            }
            "7" => match registry.engine().store().purge_expired() {
                Ok(n) => println!("{} estados purgados", n),
                Err(e) => eprintln!("Error purgando: {}", e),
            },
            "8" => break,
            _ => println!("Opción no válida"),
        }
    }
    Ok(())
}

// Muestra la respuesta y devuelve la nueva posición. `current` es la
// posición previa, que se conserva al volver a pintar un formulario o al
// salir hacia una página informativa.
fn follow(flow: FlowType, current: Option<(String, String)>, resp: StepResponse) -> Option<Cursor> {
    match resp {
        StepResponse::Redirect(url) => {
            println!("-> {}", url);
            if let Some((id, step)) = parse_step_url(&url) {
                return Some(Cursor { flow, id, step });
            }
            // Desde una salida se puede volver al paso en el que estaba.
            if is_exit_url(&url) {
                return current.map(|(id, step)| Cursor { flow, id, step });
            }
            None
        }
        StepResponse::Render { step, errors, .. } => {
            for (field, msg) in &errors {
                println!("  {}: {}", field, msg);
            }
            let id = current.map(|(id, _)| id)?;
            Some(Cursor { flow, id, step: step.to_string() })
        }
        StepResponse::Completed { submissions, redirect } => {
            for s in &submissions {
                println!("Envío '{}' (huella {})", s.kind(), s.fingerprint);
                if let Ok(json) = serde_json::to_string_pretty(s) {
                    println!("{}", json);
                }
            }
            println!("-> {}", redirect);
            None
        }
    }
}

fn read_form() -> io::Result<FormData> {
    let mut raw = FormData::new();
    loop {
        let line = prompt("  ")?;
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        match line.split_once('=') {
            Some((k, v)) => {
                raw.insert(k.trim().to_string(), v.trim().to_string());
            }
            None => println!("  formato: campo=valor"),
        }
    }
    Ok(raw)
}

fn prompt(msg: &str) -> io::Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wizard_state::{Locale, WizardState, WizardStateId};

    #[test]
    fn parses_step_urls() {
        assert_eq!(parse_step_url("/en/apply/abc/tax-filing"), Some(("abc".to_string(), "tax-filing".to_string())));
        assert_eq!(parse_step_url("/en/apply"), None);
        assert_eq!(parse_step_url("/fr/renew/file-your-taxes"), None);
    }

    #[test]
    fn render_keeps_the_current_state_id() {
        let state = WizardState::new(WizardStateId::new(), "apply", Locale::En);
        let resp = StepResponse::Render { step: "tax-filing", previous: None, errors: Default::default(), state };
        let c = follow(FlowType::Apply, Some(("abc".into(), "tax-filing".into())), resp).unwrap();
        assert_eq!(c.id, "abc");
        assert_eq!(c.step, "tax-filing");
    }

    #[test]
    fn exit_redirect_keeps_the_position_and_restart_drops_it() {
        let current = Some(("abc".to_string(), "tax-filing".to_string()));
        let resp = StepResponse::Redirect("/en/apply/file-your-taxes".into());
        let c = follow(FlowType::Apply, current.clone(), resp).unwrap();
        assert_eq!((c.id.as_str(), c.step.as_str()), ("abc", "tax-filing"));

        assert!(follow(FlowType::Apply, current, StepResponse::Redirect("/en/apply".into())).is_none());
    }
}
