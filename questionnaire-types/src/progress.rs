use crate::{Answers, QuestionCatalog};

/// Completion percentage, `0..=100`, of `answers` against `catalog`.
///
/// Rounds half up. An empty catalog has no progress.
pub fn compute(catalog: &QuestionCatalog, answers: &Answers) -> u8 {
    percent(answers.count_answered(catalog), catalog.len())
}

fn percent(answered: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let answered = answered.min(total);
    // round(100 * a / n) == floor((200 * a + n) / 2n)
    ((200 * answered + total) / (2 * total)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Question, QuestionKind};

    fn catalog(n: usize) -> QuestionCatalog {
        QuestionCatalog::new(
            (0..n).map(|i| Question::new(format!("q{i}"), "?", QuestionKind::Boolean)),
        )
        .unwrap()
    }

    #[test]
    fn empty_catalog_is_zero() {
        assert_eq!(compute(&QuestionCatalog::empty(), &Answers::new()), 0);
    }

    #[test]
    fn quarters() {
        let catalog = catalog(4);
        let mut answers = Answers::new();
        assert_eq!(compute(&catalog, &answers), 0);

        let mut seen = Vec::new();
        for i in 0..4 {
            answers = answers.set(format!("q{i}"), true);
            seen.push(compute(&catalog, &answers));
        }
        assert_eq!(seen, vec![25, 50, 75, 100]);
    }

    #[test]
    fn rounds_half_up() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13);
    }

    #[test]
    fn stale_answers_do_not_count() {
        let catalog = catalog(2);
        let answers = Answers::new().set("q0", true).set("gone", true);
        assert_eq!(compute(&catalog, &answers), 50);
    }
}
