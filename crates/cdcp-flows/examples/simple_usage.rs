// Ejemplo: recorre el flujo de renovación con almacenes en memoria.
use cdcp_flows::{FlowRegistry, FlowType, StepResponse};
use std::error::Error;
use std::sync::Arc;
use wizard_state::stubs::{InMemorySession, InMemoryStateStore};
use wizard_state::{form, Locale, WizardConfig};

fn main() -> Result<(), Box<dyn Error>> {
  let registry = FlowRegistry::new(Arc::new(InMemoryStateStore::new()), WizardConfig::default());
  let handler = registry.handler(FlowType::Renew)?;
  let session = InMemorySession::new();

  let StepResponse::Redirect(url) = handler.start(&session, Locale::En)? else {
    return Err("respuesta inesperada al iniciar".into());
  };
  let id = url.split('/').nth(3).ok_or("URL sin id")?.to_string();
  println!("inicio -> {}", url);

  let steps: [(&str, Vec<(&str, &str)>); 4] =
    [("renewal-confirmation", vec![("clientNumber", "12345678901"), ("hasChanges", "no")]),
     ("applicant-information",
      vec![("firstName", "Ana"), ("lastName", "Roy"), ("socialInsuranceNumber", "046454286")]),
     ("dental-insurance", vec![("dentalInsurance", "no")]),
     ("submit", vec![("acknowledgeTerms", "yes"), ("acknowledgePrivacy", "yes")])];
  for (step, fields) in steps.iter() {
    match handler.submit_step(&session, Locale::En, &id, step, &form(fields))? {
      StepResponse::Redirect(next) => println!("{} -> {}", step, next),
      StepResponse::Render { errors, .. } => println!("{} con errores: {:?}", step, errors),
      StepResponse::Completed { submissions, redirect } => {
        for s in submissions {
          println!("envío {} ({})", s.kind(), s.fingerprint);
        }
        println!("-> {}", redirect);
      }
    }
  }
  Ok(())
}
