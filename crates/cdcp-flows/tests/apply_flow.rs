use cdcp_flows::{FlowRegistry, FlowType, FlowsError, StepResponse, SubmissionBody};
use std::sync::Arc;
use wizard_state::stubs::{InMemorySession, InMemoryStateStore, UnavailableStateStore};
use wizard_state::{form, Locale, StoreError, WizardConfig, WizardError};

fn registry() -> FlowRegistry<InMemoryStateStore> {
  FlowRegistry::new(Arc::new(InMemoryStateStore::new()), WizardConfig::default())
}

fn redirect(resp: StepResponse) -> String {
  match resp {
    StepResponse::Redirect(url) => url,
    other => panic!("se esperaba redirección, llegó {:?}", other),
  }
}

fn id_from(url: &str) -> String {
  url.split('/').nth(3).expect("id en la URL").to_string()
}

const APPLICANT: [(&str, &str); 3] = [("firstName", "Ana"), ("lastName", "Roy"), ("socialInsuranceNumber", "046 454 286")];
const BIRTH: [(&str, &str); 3] = [("dateOfBirthYear", "1980"), ("dateOfBirthMonth", "1"), ("dateOfBirthDay", "2")];
const ADDRESS: [(&str, &str); 4] = [("address", "1 Main St"), ("city", "Ottawa"), ("province", "on"), ("postalCode", "k1a0b1")];

#[test]
fn married_applicant_walks_every_step_and_gets_one_submission() {
  let registry = registry();
  let h = registry.handler(FlowType::Apply).unwrap();
  let session = InMemorySession::new();

  let url = redirect(h.start(&session, Locale::En).unwrap());
  let id = id_from(&url);
  assert_eq!(url, format!("/en/apply/{}/tax-filing", id));

  let post = |step: &str, pairs: &[(&str, &str)]| h.submit_step(&session, Locale::En, &id, step, &form(pairs)).unwrap();

  assert!(redirect(post("tax-filing", &[("filedTaxes", "yes")])).ends_with("/applicant-information"));
  assert!(redirect(post("applicant-information", &APPLICANT)).ends_with("/date-of-birth"));
  assert!(redirect(post("date-of-birth", &BIRTH)).ends_with("/marital-status"));
  assert!(redirect(post("marital-status", &[("status", "married")])).ends_with("/partner-information"));
  assert!(redirect(post("partner-information",
                        &[("firstName", "Luc"),
                          ("lastName", "Roy"),
                          ("socialInsuranceNumber", "800000002"),
                          ("consent", "yes")])).ends_with("/contact-info"));
  assert!(redirect(post("contact-info",
                        &[("phone", "613-555-0100"), ("email", "ana@example.ca"), ("confirmEmail", "ana@example.ca")]))
          .ends_with("/mailing-address"));
  assert!(redirect(post("mailing-address", &ADDRESS)).ends_with("/communication-preference"));
  assert!(redirect(post("communication-preference", &[("preferredLanguage", "fr"), ("preferredMethod", "email")]))
          .ends_with("/dental-insurance"));
  assert!(redirect(post("dental-insurance", &[("dentalInsurance", "no")])).ends_with("/submit"));

  let resp = post("submit", &[("acknowledgeTerms", "yes"), ("acknowledgePrivacy", "yes")]);
  let StepResponse::Completed { submissions, redirect: confirmation } = resp else {
    panic!("se esperaba envío completado");
  };
  assert_eq!(confirmation, "/en/apply/confirmation");
  assert_eq!(submissions.len(), 1);
  assert_eq!(submissions[0].kind(), "benefit-application");
  assert_eq!(submissions[0].fingerprint.len(), 64);
  let SubmissionBody::BenefitApplication(app) = &submissions[0].body else {
    panic!("tipo de envío inesperado");
  };
  assert_eq!(app.application_reference, id);
  assert_eq!(app.applicant.social_insurance_number, "046454286");
  assert_eq!(app.partner.as_ref().map(|p| p.first_name.as_str()), Some("Luc"));
  assert_eq!(app.mailing_address.postal_code.as_deref(), Some("K1A 0B1"));
  assert_eq!(app.contact.phone.as_deref(), Some("6135550100"));

  let json = serde_json::to_value(&submissions[0]).unwrap();
  assert_eq!(json["type"], "benefit-application");
  assert_eq!(json["applicant"]["maritalStatus"], "married");

  // el estado ya no existe: volver atrás reinicia el flujo
  assert_eq!(redirect(h.show_step(&session, Locale::En, &id, "submit").unwrap()), "/en/apply");
  assert!(registry.engine().store().is_empty());
}

#[test]
fn invalid_form_renders_errors_in_the_state_locale() {
  let registry = registry();
  let h = registry.handler(FlowType::Apply).unwrap();
  let session = InMemorySession::new();
  let id = id_from(&redirect(h.start(&session, Locale::Fr).unwrap()));
  h.submit_step(&session, Locale::Fr, &id, "tax-filing", &form(&[("filedTaxes", "oui")])).unwrap();

  let resp = h.submit_step(&session,
                           Locale::Fr,
                           &id,
                           "applicant-information",
                           &form(&[("firstName", "Ana"), ("socialInsuranceNumber", "123456789")]))
              .unwrap();
  let StepResponse::Render { step, previous, errors, state } = resp else {
    panic!("se esperaba el formulario");
  };
  assert_eq!(step, "applicant-information");
  assert_eq!(previous, Some(format!("/fr/apply/{}/tax-filing", id)));
  assert_eq!(errors.len(), 2);
  assert!(errors.contains_key("lastName"));
  assert!(errors.contains_key("socialInsuranceNumber"));
  assert!(!state.contains_key("applicantInformation"));
}

#[test]
fn tampered_or_missing_id_restarts_the_flow() {
  let registry = registry();
  let h = registry.handler(FlowType::Apply).unwrap();
  let session = InMemorySession::new();
  let id = id_from(&redirect(h.start(&session, Locale::En).unwrap()));

  let other = uuid_like();
  assert_ne!(other, id);
  let resp = h.submit_step(&session, Locale::En, &other, "tax-filing", &form(&[("filedTaxes", "yes")])).unwrap();
  assert_eq!(redirect(resp), "/en/apply");
  assert_eq!(redirect(h.show_step(&session, Locale::En, "not-an-id", "tax-filing").unwrap()), "/en/apply");

  // otra sesión no ve el estado
  let stranger = InMemorySession::new();
  assert_eq!(redirect(h.show_step(&stranger, Locale::En, &id, "tax-filing").unwrap()), "/en/apply");
}

fn uuid_like() -> String {
  "7f1c2d3e-4b5a-4c6d-8e9f-0a1b2c3d4e5f".to_string()
}

#[test]
fn skipping_ahead_redirects_to_first_missing_step() {
  let registry = registry();
  let h = registry.handler(FlowType::Apply).unwrap();
  let session = InMemorySession::new();
  let id = id_from(&redirect(h.start(&session, Locale::En).unwrap()));

  let resp = h.show_step(&session, Locale::En, &id, "mailing-address").unwrap();
  assert_eq!(redirect(resp), format!("/en/apply/{}/tax-filing", id));

  let resp = h.show_step(&session, Locale::En, &id, "tax-filing").unwrap();
  assert!(matches!(resp, StepResponse::Render { step: "tax-filing", previous: None, .. }));
}

#[test]
fn unfiled_taxes_exit_without_losing_state() {
  let registry = registry();
  let h = registry.handler(FlowType::Apply).unwrap();
  let session = InMemorySession::new();
  let id = id_from(&redirect(h.start(&session, Locale::En).unwrap()));

  let resp = h.submit_step(&session, Locale::En, &id, "tax-filing", &form(&[("filedTaxes", "no")])).unwrap();
  assert_eq!(redirect(resp), "/en/apply/file-your-taxes");
  let resp = h.show_step(&session, Locale::En, &id, "tax-filing").unwrap();
  assert!(matches!(resp, StepResponse::Render { .. }));
}

#[test]
fn unknown_step_is_an_error() {
  let registry = registry();
  let h = registry.handler(FlowType::Apply).unwrap();
  let session = InMemorySession::new();
  let id = id_from(&redirect(h.start(&session, Locale::En).unwrap()));
  let err = h.show_step(&session, Locale::En, &id, "renewal-confirmation").unwrap_err();
  assert!(matches!(err, FlowsError::UnknownStep { .. }));
  assert!(matches!(registry.handler_for("transfer"), Err(FlowsError::UnknownFlow(_))));
}

// Lleva el flujo hasta la página de revisión (todo salvo `submit`).
fn fill_until_review(h: &cdcp_flows::FlowHandler<InMemoryStateStore>,
                     session: &InMemorySession,
                     id: &str,
                     status: &str,
                     method: &str) {
  let post = |step: &str, pairs: &[(&str, &str)]| {
    let resp = h.submit_step(session, Locale::En, id, step, &form(pairs)).unwrap();
    assert!(matches!(resp, StepResponse::Redirect(_)), "paso {} rechazado: {:?}", step, resp);
  };
  post("tax-filing", &[("filedTaxes", "yes")]);
  post("applicant-information", &APPLICANT);
  post("date-of-birth", &BIRTH);
  post("marital-status", &[("status", status)]);
  if status == "married" || status == "common-law" {
    post("partner-information",
         &[("firstName", "Luc"), ("lastName", "Roy"), ("socialInsuranceNumber", "800000002"), ("consent", "yes")]);
  }
  post("contact-info", &[("phone", "6135550100")]);
  post("mailing-address", &ADDRESS);
  post("communication-preference", &[("preferredLanguage", "en"), ("preferredMethod", method)]);
  post("dental-insurance", &[("dentalInsurance", "yes")]);
}

#[test]
fn editing_marital_status_drops_or_requests_partner_information() {
  let registry = registry();
  let h = registry.handler(FlowType::Apply).unwrap();
  let session = InMemorySession::new();
  let id = id_from(&redirect(h.start(&session, Locale::En).unwrap()));
  fill_until_review(h, &session, &id, "married", "mail");

  let resp = h.edit_step(&session, Locale::En, &id, "marital-status").unwrap();
  assert_eq!(redirect(resp), format!("/en/apply/{}/marital-status", id));

  // a soltero: el paso de pareja se borra y se vuelve a la revisión
  let resp = h.submit_step(&session, Locale::En, &id, "marital-status", &form(&[("status", "single")])).unwrap();
  assert_eq!(redirect(resp), format!("/en/apply/{}/submit", id));
  let state = registry.engine().load_state(&session, "apply", &id).unwrap();
  assert!(state.edit_mode);
  assert!(!state.contains_key("partnerInformation"));

  // de vuelta a casado: hay que rellenar la pareja de nuevo
  let resp = h.submit_step(&session, Locale::En, &id, "marital-status", &form(&[("status", "common-law")])).unwrap();
  assert_eq!(redirect(resp), format!("/en/apply/{}/partner-information", id));
}

#[test]
fn completing_early_redirects_to_the_missing_step() {
  let registry = registry();
  let h = registry.handler(FlowType::Apply).unwrap();
  let session = InMemorySession::new();
  let id = id_from(&redirect(h.start(&session, Locale::En).unwrap()));
  fill_until_review(h, &session, &id, "single", "mail");

  let resp = h.complete(&session, Locale::En, &id).unwrap();
  assert_eq!(redirect(resp), format!("/en/apply/{}/submit", id));
  assert_eq!(registry.engine().store().len(), 1);
}

#[test]
fn email_preference_without_email_sends_back_to_contact_info() {
  let registry = registry();
  let h = registry.handler(FlowType::Apply).unwrap();
  let session = InMemorySession::new();
  let id = id_from(&redirect(h.start(&session, Locale::En).unwrap()));
  fill_until_review(h, &session, &id, "single", "email");

  let resp = h.submit_step(&session,
                           Locale::En,
                           &id,
                           "submit",
                           &form(&[("acknowledgeTerms", "yes"), ("acknowledgePrivacy", "yes")]))
              .unwrap();
  assert_eq!(redirect(resp), format!("/en/apply/{}/contact-info", id));
  assert_eq!(registry.engine().store().len(), 1);
}

#[test]
fn abandon_discards_state() {
  let registry = registry();
  let h = registry.handler(FlowType::Apply).unwrap();
  let session = InMemorySession::new();
  let id = id_from(&redirect(h.start(&session, Locale::En).unwrap()));
  assert_eq!(redirect(h.abandon(&session, Locale::En).unwrap()), "/en/apply");
  assert!(registry.engine().store().is_empty());
  assert_eq!(redirect(h.show_step(&session, Locale::En, &id, "tax-filing").unwrap()), "/en/apply");
}

#[test]
fn store_outage_is_not_turned_into_a_redirect() {
  let registry = FlowRegistry::new(Arc::new(UnavailableStateStore), WizardConfig::default());
  let h = registry.handler(FlowType::Apply).unwrap();
  let session = InMemorySession::new();
  let err = h.start(&session, Locale::En).unwrap_err();
  assert!(matches!(err, FlowsError::Wizard(WizardError::Store(StoreError::Unavailable(_)))));
}

#[test]
fn out_of_order_post_is_rejected_without_touching_state() {
  let registry = registry();
  let h = registry.handler(FlowType::Apply).unwrap();
  let session = InMemorySession::new();
  let id = id_from(&redirect(h.start(&session, Locale::En).unwrap()));
  h.submit_step(&session, Locale::En, &id, "tax-filing", &form(&[("filedTaxes", "yes")])).unwrap();
  let before = registry.engine().load_state(&session, "apply", &id).unwrap();

  // pareja antes de estado civil: el paso ni siquiera aplica todavía
  let resp = h.submit_step(&session,
                           Locale::En,
                           &id,
                           "partner-information",
                           &form(&[("firstName", "Luc"),
                                   ("lastName", "Roy"),
                                   ("socialInsuranceNumber", "800000002"),
                                   ("consent", "yes")]))
              .unwrap();
  assert_eq!(redirect(resp), format!("/en/apply/{}/applicant-information", id));

  // paso aplicable pero con pasos previos pendientes
  let resp = h.submit_step(&session, Locale::En, &id, "contact-info", &form(&[("phone", "6135550100")])).unwrap();
  assert_eq!(redirect(resp), format!("/en/apply/{}/applicant-information", id));

  let after = registry.engine().load_state(&session, "apply", &id).unwrap();
  assert_eq!(after.fields, before.fields);
  assert_eq!(after.fields.keys().collect::<Vec<_>>(), vec!["taxFiling"]);
}

#[test]
fn partner_post_for_single_applicant_is_not_persisted() {
  let registry = registry();
  let h = registry.handler(FlowType::Apply).unwrap();
  let session = InMemorySession::new();
  let id = id_from(&redirect(h.start(&session, Locale::En).unwrap()));
  fill_until_review(h, &session, &id, "single", "mail");

  let resp = h.submit_step(&session,
                           Locale::En,
                           &id,
                           "partner-information",
                           &form(&[("firstName", "Luc"),
                                   ("lastName", "Roy"),
                                   ("socialInsuranceNumber", "800000002"),
                                   ("consent", "yes")]))
              .unwrap();
  assert_eq!(redirect(resp), format!("/en/apply/{}/submit", id));
  let state = registry.engine().load_state(&session, "apply", &id).unwrap();
  assert!(!state.contains_key("partnerInformation"));
}
