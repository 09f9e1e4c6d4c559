//! Practice scenarios and their opening questions.

use rand::seq::SliceRandom;

/// A role-play setting offered on the conversations screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenario {
    pub id: &'static str,
    /// Display name; also the value substituted into the conversation prompt.
    pub title: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub opening_questions: &'static [&'static str],
}

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        id: "office",
        title: "Office",
        icon: "💼",
        description: "Business conversations and workplace scenarios",
        opening_questions: &[
            "Good morning! I'm your colleague. I noticed you're working on the quarterly report. How is it going? Are you facing any challenges?",
            "Hi! Did you attend the team meeting yesterday? I missed it and wondered what was discussed.",
            "Hey there! I heard we have a new project starting next week. Have you been assigned to any team yet?",
            "Good afternoon! The deadline for the budget proposal is approaching. How are you managing your tasks?",
            "Hi! I'm preparing a presentation for the client. Could you help me with some feedback when you have time?",
        ],
    },
    Scenario {
        id: "bus",
        title: "Bus/Transport",
        icon: "🚌",
        description: "Public transportation and travel situations",
        opening_questions: &[
            "Excuse me, does this bus go to the city center? I'm trying to get to the main train station.",
            "Hello! I'm new to this city. Which bus should I take to reach the shopping mall?",
            "Hi there! Do you know how often this bus comes? I've been waiting for a while.",
            "Excuse me, is this seat taken? Also, do we need to buy tickets before boarding?",
            "Good morning! I need to get to the airport. Is this the right bus, or should I take a taxi?",
        ],
    },
    Scenario {
        id: "hospital",
        title: "Hospital",
        icon: "🏥",
        description: "Medical appointments and health-related conversations",
        opening_questions: &[
            "Hello, I have an appointment with Dr. Smith today. Could you tell me which floor the cardiology department is on?",
            "Excuse me, I need to get some blood tests done. Where is the laboratory located?",
            "Hi, I'm here to visit a patient. Could you tell me the visiting hours and which ward they might be in?",
            "Good morning! I need to pick up a prescription. Can you direct me to the pharmacy?",
            "Hello! I'm not feeling well and need to see a doctor urgently. Is there an emergency department here?",
        ],
    },
    Scenario {
        id: "school",
        title: "School",
        icon: "🏫",
        description: "Educational settings and student interactions",
        opening_questions: &[
            "Hi! I'm new here. Can you help me find the library? Also, which classes do you have today?",
            "Hey! Did you finish the homework for math class? I'm stuck on question number 5.",
            "Good morning! Are you going to the science fair next week? I heard there will be some amazing projects.",
            "Hi there! I forgot my textbook at home. Can I share yours during the English class?",
            "Hello! Which after-school activities are you planning to join this semester?",
        ],
    },
    Scenario {
        id: "college",
        title: "College",
        icon: "🎓",
        description: "University life and academic discussions",
        opening_questions: &[
            "Hey! Are you taking Professor Johnson's class this semester? I heard it's really interesting. What's your major?",
            "Hi! Did you register for the internship program? The deadline is this Friday.",
            "Good morning! I'm looking for study partners for the upcoming midterm exams. Are you interested?",
            "Hey there! Have you decided on your research topic for the final year project?",
            "Hi! Are you attending the guest lecture tomorrow? I heard the speaker is from a top tech company.",
        ],
    },
    Scenario {
        id: "market",
        title: "Market",
        icon: "🛒",
        description: "Shopping and marketplace conversations",
        opening_questions: &[
            "Hello! I'm looking for fresh vegetables. Could you tell me where I can find tomatoes and cucumbers? How much do they cost?",
            "Excuse me! Do you have organic fruits today? I'm especially looking for apples and oranges.",
            "Hi! I need to buy some spices for cooking. Where is the spice section, and do you have fresh coriander?",
            "Good morning! Are these mangoes ripe? How much do they cost per kilogram?",
            "Hello! I'm looking for a good deal on rice and lentils. What's the price today?",
        ],
    },
];

/// Look up a scenario by its display title.
pub fn find(title: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.title == title)
}

/// Opening line used when a title has no question set.
pub fn fallback_question(title: &str) -> String {
    format!(
        "Hello! Let's practice a {} conversation. I'll start with a question.",
        title.to_lowercase()
    )
}

/// Pick an opening question for `title` uniformly at random.
pub fn random_opening_question(title: &str) -> String {
    random_opening_question_with(title, &mut rand::thread_rng())
}

/// Same as [`random_opening_question`] with a caller-supplied RNG.
pub fn random_opening_question_with<R: rand::Rng + ?Sized>(title: &str, rng: &mut R) -> String {
    find(title)
        .and_then(|s| s.opening_questions.choose(rng))
        .map(|q| q.to_string())
        .unwrap_or_else(|| fallback_question(title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn six_scenarios_with_five_questions_each() {
        assert_eq!(SCENARIOS.len(), 6);
        for s in SCENARIOS {
            assert_eq!(s.opening_questions.len(), 5, "{}", s.title);
            assert!(!s.description.is_empty());
        }
    }

    #[test]
    fn question_is_member_of_its_set() {
        let mut rng = StdRng::seed_from_u64(7);
        for s in SCENARIOS {
            for _ in 0..20 {
                let q = random_opening_question_with(s.title, &mut rng);
                assert!(s.opening_questions.contains(&q.as_str()));
            }
        }
    }

    #[test]
    fn every_question_is_reachable() {
        let mut rng = StdRng::seed_from_u64(42);
        let market = find("Market").unwrap();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(random_opening_question_with("Market", &mut rng));
        }
        assert_eq!(seen.len(), market.opening_questions.len());
    }

    #[test]
    fn unknown_scenario_falls_back() {
        assert_eq!(
            random_opening_question("Airport Lounge"),
            "Hello! Let's practice a airport lounge conversation. I'll start with a question."
        );
    }

    #[test]
    fn lookup_is_by_exact_title() {
        assert_eq!(find("Bus/Transport").map(|s| s.id), Some("bus"));
        assert!(find("office").is_none());
    }
}
