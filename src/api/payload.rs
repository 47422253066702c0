//! Request body validation.
//!
//! Bodies are taken as raw JSON and checked field by field so a single
//! response can list every problem, keyed by the wire field name.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};

use uuid::Uuid;

use crate::database::models::{NewProperty, NewProposal, PropertyPatch, PropertyType};

/// Largest rent the `NUMERIC(10, 2)` column holds.
const MAX_RENT: i64 = 100_000_000;

/// Width of the name and e-mail columns on account tables.
const MAX_ACCOUNT_FIELD: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    #[serde(rename = "campo")]
    pub field: String,
    #[serde(rename = "mensagem")]
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

pub type Violations = Vec<FieldViolation>;

struct Reader<'a> {
    obj: &'a Map<String, Value>,
    violations: Violations,
}

impl<'a> Reader<'a> {
    fn new(body: &'a Value) -> Result<Self, Violations> {
        match body.as_object() {
            Some(obj) => Ok(Self { obj, violations: Vec::new() }),
            None => Err(vec![FieldViolation::new("body", "Esperado um objeto JSON")]),
        }
    }

    fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.violations.push(FieldViolation::new(field, message));
    }

    /// Record a missing-field violation when `key` is absent.
    fn required<T>(&mut self, key: &str, parsed: Option<T>) -> Option<T> {
        if !self.obj.contains_key(key) {
            self.fail(key, "Campo obrigatório");
        }
        parsed
    }

    fn text(&mut self, key: &str, min: usize, max: usize) -> Option<String> {
        match self.obj.get(key)? {
            Value::String(s) => {
                let len = s.chars().count();
                if len < min {
                    self.fail(key, format!("Deve possuir, no mínimo, {} caractere(s)", min));
                    None
                } else if len > max {
                    self.fail(key, format!("Deve possuir, no máximo, {} caractere(s)", max));
                    None
                } else {
                    Some(s.clone())
                }
            }
            _ => {
                self.fail(key, "Esperado texto");
                None
            }
        }
    }

    /// Optional text column: absent is `None`, `null` is `Some(None)`.
    fn nullable_text(&mut self, key: &str) -> Option<Option<String>> {
        match self.obj.get(key)? {
            Value::Null => Some(None),
            Value::String(s) if s.is_empty() => {
                self.fail(key, "Deve possuir, no mínimo, 1 caractere(s)");
                None
            }
            Value::String(s) => Some(Some(s.clone())),
            _ => {
                self.fail(key, "Esperado texto");
                None
            }
        }
    }

    fn kind(&mut self, key: &str) -> Option<PropertyType> {
        let parsed = match self.obj.get(key)? {
            Value::String(s) => s.parse::<PropertyType>().ok(),
            _ => None,
        };
        if parsed.is_none() {
            let allowed: Vec<&str> = PropertyType::ALL.iter().map(|k| k.as_str()).collect();
            self.fail(key, format!("Tipo inválido. Esperado um de: {}", allowed.join(", ")));
        }
        parsed
    }

    /// Accepts a JSON number or a string holding a number.
    fn rent(&mut self, key: &str) -> Option<Decimal> {
        let parsed = match self.obj.get(key)? {
            Value::Number(n) => parse_decimal(&n.to_string()),
            Value::String(s) => parse_decimal(s),
            _ => None,
        };

        match parsed.map(|v| v.round_dp(2)) {
            Some(v) if v <= Decimal::ZERO => {
                self.fail(key, "Deve ser um valor positivo");
                None
            }
            Some(v) if v >= Decimal::from(MAX_RENT) => {
                self.fail(key, "Deve ser menor que 100000000");
                None
            }
            Some(v) => Some(v),
            None => {
                self.fail(key, "Esperado um número");
                None
            }
        }
    }

    fn flag(&mut self, key: &str) -> Option<bool> {
        match self.obj.get(key)? {
            Value::Bool(b) => Some(*b),
            _ => {
                self.fail(key, "Esperado verdadeiro ou falso");
                None
            }
        }
    }

    fn integer(&mut self, key: &str, min: i64, max: i64) -> Option<i64> {
        match self.obj.get(key)?.as_i64() {
            Some(v) if v < min => {
                self.fail(key, format!("Nível, no mínimo, {}", min));
                None
            }
            Some(v) if v > max => {
                self.fail(key, format!("Nível, no máximo, {}", max));
                None
            }
            Some(v) => Some(v),
            None => {
                self.fail(key, "Esperado um número inteiro");
                None
            }
        }
    }

    fn finish<T>(self, value: Option<T>) -> Result<T, Violations> {
        match value {
            Some(v) if self.violations.is_empty() => Ok(v),
            _ => Err(self.violations),
        }
    }
}

/// Parse a decimal written plainly or in scientific notation.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(raw).ok())
}

/// Validate a full listing payload for creation.
pub fn parse_new_property(body: &Value) -> Result<NewProperty, Violations> {
    let mut r = Reader::new(body)?;

    let title = r.text("titulo", 3, 100);
    let title = r.required("titulo", title);
    let description = r.nullable_text("descricao");
    let address = r.text("endereco", 3, 255);
    let address = r.required("endereco", address);
    let city = r.text("cidade", 2, 60);
    let city = r.required("cidade", city);
    let neighborhood = r.nullable_text("bairro");
    let postal_code = r.nullable_text("cep");
    let kind = r.kind("tipo");
    let kind = r.required("tipo", kind);
    let monthly_rent = r.rent("aluguelMensal");
    let monthly_rent = r.required("aluguelMensal", monthly_rent);
    let available = r.flag("disponivel");
    let photos = r.nullable_text("fotos");

    let property = match (title, address, city, kind, monthly_rent) {
        (Some(title), Some(address), Some(city), Some(kind), Some(monthly_rent)) => Some(NewProperty {
            title,
            description: description.flatten(),
            address,
            city,
            neighborhood: neighborhood.flatten(),
            postal_code: postal_code.flatten(),
            kind,
            monthly_rent,
            available: available.unwrap_or(true),
            photos: photos.flatten(),
        }),
        _ => None,
    };

    r.finish(property)
}

/// Validate a partial listing payload. Absent fields stay untouched; unknown
/// fields are ignored.
pub fn parse_property_patch(body: &Value) -> Result<PropertyPatch, Violations> {
    let mut r = Reader::new(body)?;

    let patch = PropertyPatch {
        title: r.text("titulo", 3, 100),
        description: r.nullable_text("descricao"),
        address: r.text("endereco", 3, 255),
        city: r.text("cidade", 2, 60),
        neighborhood: r.nullable_text("bairro"),
        postal_code: r.nullable_text("cep"),
        kind: r.kind("tipo"),
        monthly_rent: r.rent("aluguelMensal"),
        available: r.flag("disponivel"),
        photos: r.nullable_text("fotos"),
    };

    r.finish(Some(patch))
}

/// Listing ids are positive integers.
pub fn parse_property_id(raw: &str) -> Result<i32, Violations> {
    match raw.parse::<i32>() {
        Ok(id) if id > 0 && raw.bytes().all(|b| b.is_ascii_digit()) => Ok(id),
        _ => Err(vec![FieldViolation::new("id", "Id deve ser um número inteiro positivo")]),
    }
}

/// Validate a customer's proposal on a listing.
pub fn parse_new_proposal(body: &Value) -> Result<NewProposal, Violations> {
    let mut r = Reader::new(body)?;

    let customer_id = match r.obj.get("clienteId") {
        Some(Value::String(s)) => match Uuid::parse_str(s) {
            Ok(id) => Some(id),
            Err(_) => {
                r.fail("clienteId", "Id do cliente deve ser um UUID válido");
                None
            }
        },
        Some(_) => {
            r.fail("clienteId", "Esperado texto");
            None
        }
        None => None,
    };
    let customer_id = r.required("clienteId", customer_id);

    let property_id = match r.obj.get("imovelId") {
        Some(Value::Number(n)) => match n.as_i64().and_then(|v| i32::try_from(v).ok()) {
            Some(id) if id > 0 => Some(id),
            _ => {
                r.fail("imovelId", "Id deve ser um número inteiro positivo");
                None
            }
        },
        Some(_) => {
            r.fail("imovelId", "Esperado um número");
            None
        }
        None => None,
    };
    let property_id = r.required("imovelId", property_id);

    let description = match r.obj.get("descricao") {
        Some(Value::String(s)) if s.chars().count() < 10 => {
            r.fail("descricao", "Descrição da Proposta deve possuir, no mínimo, 10 caracteres");
            None
        }
        Some(Value::String(s)) if s.chars().count() > 255 => {
            r.fail("descricao", "Deve possuir, no máximo, 255 caractere(s)");
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            r.fail("descricao", "Esperado texto");
            None
        }
        None => None,
    };
    let description = r.required("descricao", description);

    let proposal = match (customer_id, property_id, description) {
        (Some(customer_id), Some(property_id), Some(description)) => Some(NewProposal {
            customer_id,
            property_id,
            description,
        }),
        _ => None,
    };

    r.finish(proposal)
}

/// The `resposta` of a proposal reply; `None` when absent, blank or not text.
pub fn parse_proposal_reply(body: &Value) -> Option<String> {
    let reply = body.get("resposta")?.as_str()?;
    if reply.trim().is_empty() {
        return None;
    }
    Some(reply.to_string())
}

/// Admin provisioning payload, before password policy and hashing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub level: i32,
}

pub fn parse_new_admin(body: &Value) -> Result<AdminInput, Violations> {
    let mut r = Reader::new(body)?;

    let name = match r.obj.get("nome") {
        Some(Value::String(s)) if s.chars().count() < 10 => {
            r.fail("nome", "Nome deve possuir, no mínimo, 10 caracteres");
            None
        }
        Some(Value::String(s)) if s.chars().count() > MAX_ACCOUNT_FIELD => {
            r.fail("nome", format!("Nome deve possuir, no máximo, {} caracteres", MAX_ACCOUNT_FIELD));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            r.fail("nome", "Esperado texto");
            None
        }
        None => None,
    };
    let name = r.required("nome", name);

    let email = match r.obj.get("email") {
        Some(Value::String(s)) if s.chars().count() > MAX_ACCOUNT_FIELD => {
            r.fail("email", format!("E-mail deve possuir, no máximo, {} caracteres", MAX_ACCOUNT_FIELD));
            None
        }
        Some(Value::String(s)) => match validate_email_format(s) {
            Ok(()) => Some(s.clone()),
            Err(msg) => {
                r.fail("email", msg);
                None
            }
        },
        Some(_) => {
            r.fail("email", "Esperado texto");
            None
        }
        None => None,
    };
    let email = r.required("email", email);

    let password = r.text("senha", 0, usize::MAX);
    let password = r.required("senha", password);
    let level = r.integer("nivel", 1, 5);
    let level = r.required("nivel", level);

    let input = match (name, email, password, level) {
        (Some(name), Some(email), Some(password), Some(level)) => Some(AdminInput {
            name,
            email,
            password,
            level: level as i32,
        }),
        _ => None,
    };

    r.finish(input)
}

/// Basic e-mail shape check: one `@`, non-empty local part, dotted domain.
pub fn validate_email_format(email: &str) -> Result<(), &'static str> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err("E-mail inválido");
    };
    if local.is_empty()
        || domain.contains('@')
        || email.chars().any(char::is_whitespace)
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
    {
        return Err("E-mail inválido");
    }
    Ok(())
}

/// Credentials sent to the login endpoints; either field may be missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// `None` when either field is absent, blank or not a string.
    pub fn from_body(body: &Value) -> Option<Self> {
        let email = body.get("email")?.as_str()?.trim();
        let password = body.get("senha")?.as_str()?;
        if email.is_empty() || password.is_empty() {
            return None;
        }
        Some(Self { email: email.to_string(), password: password.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(violations: &[FieldViolation]) -> Vec<&str> {
        violations.iter().map(|v| v.field.as_str()).collect()
    }

    fn valid_body() -> Value {
        json!({
            "titulo": "Casa com pátio",
            "endereco": "Rua Gonçalves Chaves, 300",
            "cidade": "Pelotas",
            "tipo": "CASA",
            "aluguelMensal": 1200
        })
    }

    #[test]
    fn minimal_payload_gets_defaults() {
        let property = parse_new_property(&valid_body()).unwrap();
        assert_eq!(property.title, "Casa com pátio");
        assert_eq!(property.kind, PropertyType::House);
        assert_eq!(property.monthly_rent, Decimal::from(1200));
        assert!(property.available);
        assert_eq!(property.description, None);
    }

    #[test]
    fn rent_accepts_numeric_strings() {
        let mut body = valid_body();
        body["aluguelMensal"] = json!("1350.50");
        let property = parse_new_property(&body).unwrap();
        assert_eq!(property.monthly_rent, "1350.50".parse::<Decimal>().unwrap());

        body["aluguelMensal"] = json!(999.9);
        let property = parse_new_property(&body).unwrap();
        assert_eq!(property.monthly_rent, "999.9".parse::<Decimal>().unwrap());
    }

    #[test]
    fn rent_must_be_positive_and_numeric() {
        for bad in [json!(0), json!(-10), json!("abc"), json!(true), json!("0.001")] {
            let mut body = valid_body();
            body["aluguelMensal"] = bad;
            let errs = parse_new_property(&body).unwrap_err();
            assert_eq!(fields(&errs), vec!["aluguelMensal"]);
        }
    }

    #[test]
    fn rent_too_large_for_the_column_has_its_own_message() {
        let mut body = valid_body();
        body["aluguelMensal"] = json!(100_000_000);
        let errs = parse_new_property(&body).unwrap_err();
        assert_eq!(errs[0].message, "Deve ser menor que 100000000");

        body["aluguelMensal"] = json!("99999999.99");
        assert!(parse_new_property(&body).is_ok());

        body["aluguelMensal"] = json!(-1);
        let errs = parse_new_property(&body).unwrap_err();
        assert_eq!(errs[0].message, "Deve ser um valor positivo");
    }

    #[test]
    fn all_problems_are_reported_together() {
        let body = json!({
            "titulo": "ab",
            "cidade": "P",
            "tipo": "CASTELO",
            "aluguelMensal": 1000,
            "disponivel": "sim",
            "bairro": ""
        });
        let errs = parse_new_property(&body).unwrap_err();
        assert_eq!(
            fields(&errs),
            vec!["titulo", "endereco", "cidade", "bairro", "tipo", "disponivel"]
        );
        assert_eq!(errs[1].message, "Campo obrigatório");
    }

    #[test]
    fn nullable_fields_accept_null() {
        let mut body = valid_body();
        body["descricao"] = Value::Null;
        body["fotos"] = json!("https://img/1.jpg");
        let property = parse_new_property(&body).unwrap();
        assert_eq!(property.description, None);
        assert_eq!(property.photos.as_deref(), Some("https://img/1.jpg"));
    }

    #[test]
    fn non_object_body_is_rejected() {
        let errs = parse_new_property(&json!([1, 2])).unwrap_err();
        assert_eq!(fields(&errs), vec!["body"]);
    }

    #[test]
    fn patch_keeps_absent_fields_untouched() {
        let patch = parse_property_patch(&json!({ "aluguelMensal": "800", "bairro": null, "extra": 1 })).unwrap();
        assert_eq!(patch.monthly_rent, Some(Decimal::from(800)));
        assert_eq!(patch.neighborhood, Some(None));
        assert_eq!(patch.title, None);
        assert_eq!(patch.available, None);

        assert!(parse_property_patch(&json!({})).unwrap().is_empty());
    }

    #[test]
    fn patch_still_validates_present_fields() {
        let errs = parse_property_patch(&json!({ "titulo": null, "tipo": "casa" })).unwrap_err();
        assert_eq!(fields(&errs), vec!["titulo", "tipo"]);
    }

    #[test]
    fn property_ids_must_be_positive_integers() {
        assert_eq!(parse_property_id("42"), Ok(42));
        assert!(parse_property_id("abc").is_err());
        assert!(parse_property_id("0").is_err());
        assert!(parse_property_id("-3").is_err());
        assert!(parse_property_id("+3").is_err());
        assert!(parse_property_id("99999999999").is_err());
    }

    #[test]
    fn parse_decimal_handles_scientific_notation() {
        assert_eq!(parse_decimal("1e3"), Some(Decimal::from(1000)));
        assert_eq!(parse_decimal(" 1500 "), Some(Decimal::from(1500)));
        assert_eq!(parse_decimal("Pelotas"), None);
        assert_eq!(parse_decimal(""), None);
    }

    #[test]
    fn admin_payload_rules() {
        let ok = parse_new_admin(&json!({
            "nome": "Administrador Sistema",
            "email": "admin@alugaaqui.com",
            "senha": "Admin@123",
            "nivel": 1
        }))
        .unwrap();
        assert_eq!(ok.level, 1);

        let errs = parse_new_admin(&json!({
            "nome": "Curto",
            "email": "sem-arroba",
            "nivel": 7
        }))
        .unwrap_err();
        assert_eq!(fields(&errs), vec!["nome", "email", "senha", "nivel"]);
        assert_eq!(errs[0].message, "Nome deve possuir, no mínimo, 10 caracteres");
        assert_eq!(errs[3].message, "Nível, no máximo, 5");
    }

    #[test]
    fn admin_name_and_email_fit_their_columns() {
        let long_name = "N".repeat(101);
        let long_email = format!("{}@alugaaqui.com", "a".repeat(90));
        let errs = parse_new_admin(&json!({
            "nome": long_name,
            "email": long_email,
            "senha": "Admin@123",
            "nivel": 1
        }))
        .unwrap_err();
        assert_eq!(fields(&errs), vec!["nome", "email"]);
        assert_eq!(errs[0].message, "Nome deve possuir, no máximo, 100 caracteres");
        assert_eq!(errs[1].message, "E-mail deve possuir, no máximo, 100 caracteres");

        assert!(parse_new_admin(&json!({
            "nome": "N".repeat(100),
            "email": "admin@alugaaqui.com",
            "senha": "Admin@123",
            "nivel": 1
        }))
        .is_ok());
    }

    #[test]
    fn proposal_payload_rules() {
        let ok = parse_new_proposal(&json!({
            "clienteId": "3f2504e0-4f89-41d3-9a0c-0305e82c3301",
            "imovelId": 7,
            "descricao": "Posso pagar 900 por mês?"
        }))
        .unwrap();
        assert_eq!(ok.property_id, 7);
        assert_eq!(ok.customer_id.to_string(), "3f2504e0-4f89-41d3-9a0c-0305e82c3301");

        let errs = parse_new_proposal(&json!({
            "clienteId": "cliente-1",
            "imovelId": "7",
            "descricao": "Curta"
        }))
        .unwrap_err();
        assert_eq!(fields(&errs), vec!["clienteId", "imovelId", "descricao"]);
        assert_eq!(errs[2].message, "Descrição da Proposta deve possuir, no mínimo, 10 caracteres");

        let errs = parse_new_proposal(&json!({})).unwrap_err();
        assert_eq!(fields(&errs), vec!["clienteId", "imovelId", "descricao"]);
    }

    #[test]
    fn proposal_reply_must_be_present() {
        assert_eq!(parse_proposal_reply(&json!({ "resposta": "Aceito" })).as_deref(), Some("Aceito"));
        assert_eq!(parse_proposal_reply(&json!({ "resposta": "  " })), None);
        assert_eq!(parse_proposal_reply(&json!({ "resposta": 1 })), None);
        assert_eq!(parse_proposal_reply(&json!({})), None);
    }

    #[test]
    fn email_format() {
        assert!(validate_email_format("a@b.com").is_ok());
        assert!(validate_email_format("a@b").is_err());
        assert!(validate_email_format("@b.com").is_err());
        assert!(validate_email_format("a b@c.com").is_err());
        assert!(validate_email_format("a@@b.com").is_err());
    }

    #[test]
    fn credentials_require_both_fields() {
        assert!(Credentials::from_body(&json!({ "email": "a@b.com", "senha": "x" })).is_some());
        assert!(Credentials::from_body(&json!({ "email": "a@b.com" })).is_none());
        assert!(Credentials::from_body(&json!({ "email": "", "senha": "x" })).is_none());
        assert!(Credentials::from_body(&json!({ "email": 1, "senha": "x" })).is_none());
    }
}
