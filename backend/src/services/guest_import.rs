use serde_json::json;

use crate::models::guest::{GuestImport, ImportReport};

use super::api_client::{ApiError, BackendClient};

/// Guests read from a CSV file, plus the rows that could not be used.
#[derive(Debug, Default)]
pub struct ParsedGuests {
    pub guests: Vec<GuestImport>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Column {
    Name,
    FirstName,
    Email,
    Phone,
}

/// Header names are matched case-insensitively, with or without accents,
/// in French (the downloadable template) or English.
fn column_for(header: &str) -> Option<Column> {
    let key = super::eas::normalize_slug(header);
    match key.as_str() {
        "nom" | "name" | "lastname" => Some(Column::Name),
        "prenom" | "firstname" => Some(Column::FirstName),
        "email" | "mail" | "courriel" => Some(Column::Email),
        "telephone" | "tel" | "phone" => Some(Column::Phone),
        _ => None,
    }
}

/// Parse an uploaded guest list. Columns follow the template
/// `Nom,Prénom,Email,Téléphone,Groupe,Notes`; `;` separated files (Excel
/// with a French locale) are accepted too. Rows without a name are
/// reported and skipped.
///
/// `Groupe` and `Notes` have no counterpart on the guest API and are
/// ignored; groups are assigned afterwards from the guest list.
pub fn parse_csv(data: &[u8]) -> anyhow::Result<ParsedGuests> {
    let text = String::from_utf8_lossy(data);
    let text = text.trim_start_matches('\u{feff}');
    let first_line = text.lines().next().unwrap_or_default();
    let delimiter = if first_line.matches(';').count() > first_line.matches(',').count() {
        b';'
    } else {
        b','
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let columns: Vec<Option<Column>> = reader.headers()?.iter().map(column_for).collect();
    if !columns.contains(&Some(Column::Name)) {
        anyhow::bail!("Colonne « Nom » introuvable dans le fichier");
    }

    let mut parsed = ParsedGuests::default();
    for (index, record) in reader.records().enumerate() {
        // Line 1 is the header.
        let line = index + 2;
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                parsed.errors.push(format!("Ligne {line}: {e}"));
                continue;
            }
        };
        if record.iter().all(str::is_empty) {
            continue;
        }

        let mut guest = GuestImport::default();
        for (column, value) in columns.iter().zip(record.iter()) {
            let value = (!value.is_empty()).then(|| value.to_string());
            match column {
                Some(Column::Name) => guest.name = value.unwrap_or_default(),
                Some(Column::FirstName) => guest.first_name = value,
                Some(Column::Email) => guest.email = value,
                Some(Column::Phone) => guest.phone = value,
                None => {}
            }
        }

        if guest.name.is_empty() {
            parsed.errors.push(format!("Ligne {line}: nom manquant"));
        } else {
            parsed.guests.push(guest);
        }
    }

    Ok(parsed)
}

/// Create the guests one by one on the event API. A failing guest is
/// reported and does not stop the import.
pub async fn import_guests(client: &BackendClient, event_id: &str, guests: &[GuestImport]) -> ImportReport {
    let path = format!("/api/events/{event_id}/guests");
    let mut report = ImportReport::default();

    for guest in guests {
        let body = json!({
            "name": guest.display_name(),
            "first_name": guest.first_name,
            "email": guest.email.as_deref().filter(|e| !e.is_empty()),
            "phone": guest.phone.as_deref().filter(|p| !p.is_empty()),
            "status": "pending",
            "plus_ones": 0,
        });

        match client.post(&path, &body).await {
            Ok(_) => report.created += 1,
            Err(ApiError::Backend { body, .. }) => {
                let detail = body.get("detail").and_then(|d| d.as_str()).unwrap_or("Error");
                report.errors.push(format!("{}: {}", guest.name, detail));
            }
            Err(e) => report.errors.push(format!("{}: {}", guest.name, e)),
        }
    }

    tracing::info!(
        "Imported {} guest(s) into event {} ({} error(s))",
        report.created,
        event_id,
        report.errors.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn parses_french_template() {
        let csv = "Nom,Prénom,Email,Téléphone,Groupe,Notes\n\
                   Cohen,Sarah,sarah@example.com,+33 6 12 34 56 78,Famille,\n\
                   ,Rachel,,,,\n\
                   Lévy,,,,,Végétarien\n";
        let parsed = parse_csv(csv.as_bytes()).unwrap();

        assert_eq!(parsed.guests.len(), 2);
        assert_eq!(parsed.guests[0].display_name(), "Sarah Cohen");
        assert_eq!(parsed.guests[1].name, "Lévy");
        let row = serde_json::to_value(&parsed.guests[0]).unwrap();
        assert!(row.get("group_name").is_none());
        assert!(row.get("notes").is_none());
        assert_eq!(parsed.errors, vec!["Ligne 3: nom manquant".to_string()]);
    }

    #[test]
    fn accepts_english_headers_and_semicolons() {
        let csv = "\u{feff}first_name;name;phone\nDavid;Lévy;0612345678\n";
        let parsed = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(parsed.guests[0].first_name.as_deref(), Some("David"));
        assert_eq!(parsed.guests[0].phone.as_deref(), Some("0612345678"));
    }

    #[test]
    fn missing_name_column_is_an_error() {
        assert!(parse_csv(b"email\na@b.c\n").is_err());
    }

    #[tokio::test]
    async fn import_collects_backend_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/events/1/guests")
                    .json_body_includes(r#"{"name":"Sarah Cohen","status":"pending","plus_ones":0}"#);
                then.status(201).json_body(serde_json::json!({ "id": "g1" }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/events/1/guests")
                    .json_body_includes(r#"{"name":"Lévy"}"#);
                then.status(409).json_body(serde_json::json!({ "detail": "Invité déjà existant" }));
            })
            .await;

        let client = BackendClient::new(server.base_url(), "k");
        let guests = vec![
            GuestImport { name: "Cohen".into(), first_name: Some("Sarah".into()), ..Default::default() },
            GuestImport { name: "Lévy".into(), ..Default::default() },
        ];
        let report = import_guests(&client, "1", &guests).await;

        assert_eq!(report.created, 1);
        assert_eq!(report.errors, vec!["Lévy: Invité déjà existant".to_string()]);
    }
}
