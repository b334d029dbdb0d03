use questionnaire_types::{
    AnswerIssue, AnswerValue, Answers, KindTag, QuestionCatalog, QuestionKind, progress, validation,
};

const DOCUMENT: &str = r#"[
    {"id": "q3", "tipo": "escala_likert", "texto": "Rate us", "orden": 3,
     "configuracion": {"puntos_escala": 7}},
    {"id": "q1", "tipo": "abierta", "texto": "Name?", "obligatoria": true, "orden": 1},
    {"id": "q2", "tipo": "opcion_multiple", "texto": "Toppings", "orden": 2,
     "configuracion": {"opciones": ["Cheese", "Ham", "Olives"], "seleccion_multiple": true}},
    {"id": "q4", "tipo": "verdadero_falso", "texto": "Again?", "obligatoria": true, "orden": 4}
]"#;

#[test]
fn backend_document_becomes_ordered_catalog() {
    let catalog: QuestionCatalog = serde_json::from_str(DOCUMENT).unwrap();

    let ids: Vec<_> = catalog.iter().map(|question| question.id().as_str()).collect();
    assert_eq!(ids, ["q1", "q2", "q3", "q4"]);
    assert_eq!(catalog.get(1).unwrap().kind().tag(), KindTag::MultiChoice);
    assert!(matches!(
        catalog.get(2).unwrap().kind(),
        QuestionKind::LikertScale(likert) if likert.points == 7
    ));
    assert!(catalog.lint().is_empty());
}

#[test]
fn duplicate_ids_are_rejected() {
    let result = serde_json::from_str::<QuestionCatalog>(
        r#"[{"id": "q1", "tipo": "abierta"}, {"id": "q1", "tipo": "checkbox"}]"#,
    );
    assert!(result.is_err());
}

#[test]
fn answering_a_document() {
    let catalog: QuestionCatalog = serde_json::from_str(DOCUMENT).unwrap();
    let answers = Answers::new()
        .set("q1", "Ana")
        .set("q2", vec!["Cheese", "Pineapple"])
        .set("q3", AnswerValue::Int(9));

    assert_eq!(progress::compute(&catalog, &answers), 75);

    let missing: Vec<_> = validation::find_unsatisfied_required(&catalog, &answers)
        .into_iter()
        .map(|question| question.id().as_str())
        .collect();
    assert_eq!(missing, ["q4"]);

    let issues: Vec<_> = validation::review(&catalog, &answers)
        .into_iter()
        .map(|(question, issue)| (question.id().as_str(), issue))
        .collect();
    assert!(issues.contains(&("q2", AnswerIssue::UnknownOption("Pineapple".to_string()))));
    assert!(issues.contains(&("q3", AnswerIssue::OutOfScale(7))));
}
