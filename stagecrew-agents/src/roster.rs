//! Static roster tables: the seven roles, what each is for, and its tasks.

use serde::Serialize;

/// A creative role on the production team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Role {
    ComposerLyricist,
    Book,
    Director,
    Choreographer,
    SetVisual,
    Dramaturg,
    MarketProducer,
}

impl Role {
    /// Every role, in the order agents and tasks are assembled.
    pub const ALL: [Role; 7] = [
        Role::ComposerLyricist,
        Role::Book,
        Role::Director,
        Role::Choreographer,
        Role::SetVisual,
        Role::Dramaturg,
        Role::MarketProducer,
    ];

    /// Display name handed to the engine as the agent's role.
    pub fn name(self) -> &'static str {
        match self {
            Role::ComposerLyricist => "Composer + Lyricist",
            Role::Book => "Book",
            Role::Director => "Director",
            Role::Choreographer => "Choreographer",
            Role::SetVisual => "Set/Visual",
            Role::Dramaturg => "Dramaturg",
            Role::MarketProducer => "Market/Producer",
        }
    }

    /// Parse a display name. Exact match only.
    pub fn from_name(name: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|role| role.name() == name)
    }

    pub fn profile(self) -> RoleProfile {
        match self {
            Role::ComposerLyricist => RoleProfile {
                goal: "Create compelling musical numbers and lyrics that advance the story",
                backstory: "You are an experienced composer and lyricist with a deep understanding of musical theater conventions and the ability to create memorable melodies and meaningful lyrics.",
            },
            Role::Book => RoleProfile {
                goal: "Develop a coherent and engaging narrative structure",
                backstory: "You are a skilled playwright with experience in crafting compelling stories and developing rich characters for musical theater.",
            },
            Role::Director => RoleProfile {
                goal: "Unify the creative vision and guide the overall production",
                backstory: "You are a seasoned director with expertise in bringing together various theatrical elements into a cohesive whole.",
            },
            Role::Choreographer => RoleProfile {
                goal: "Create dynamic movement that enhances the storytelling",
                backstory: "You are an innovative choreographer who specializes in creating movement that serves both the story and the music.",
            },
            Role::SetVisual => RoleProfile {
                goal: "Design compelling visual environments that support the narrative",
                backstory: "You are a creative designer with experience in creating immersive theatrical environments that enhance storytelling.",
            },
            Role::Dramaturg => RoleProfile {
                goal: "Ensure historical accuracy and narrative consistency",
                backstory: "You are a meticulous researcher and story expert who helps maintain the integrity of the production.",
            },
            Role::MarketProducer => RoleProfile {
                goal: "Develop effective marketing strategies and manage production resources",
                backstory: "You are an experienced producer with a strong understanding of theater marketing and production management.",
            },
        }
    }

    /// The role's canned tasks, in the order they run.
    pub fn task_templates(self) -> &'static [TaskTemplate] {
        match self {
            Role::ComposerLyricist => &COMPOSER_LYRICIST_TASKS,
            Role::Book => &BOOK_TASKS,
            Role::Director => &DIRECTOR_TASKS,
            Role::Choreographer => &CHOREOGRAPHER_TASKS,
            Role::SetVisual => &SET_VISUAL_TASKS,
            Role::Dramaturg => &DRAMATURG_TASKS,
            Role::MarketProducer => &MARKET_PRODUCER_TASKS,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What an agent is trying to achieve and who it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleProfile {
    pub goal: &'static str,
    pub backstory: &'static str,
}

/// Profile used for any role name outside the fixed roster.
pub const GENERIC_PROFILE: RoleProfile = RoleProfile {
    goal: "Contribute to the overall success of the production",
    backstory: "You are a theater professional with expertise in your specific domain.",
};

/// Profile for a role display name, falling back to [`GENERIC_PROFILE`].
pub fn profile_for_name(name: &str) -> RoleProfile {
    match Role::from_name(name) {
        Some(role) => role.profile(),
        None => GENERIC_PROFILE,
    }
}

/// Task templates for a role display name. Unknown names have none.
pub fn templates_for_name(name: &str) -> &'static [TaskTemplate] {
    match Role::from_name(name) {
        Some(role) => role.task_templates(),
        None => &[],
    }
}

/// A canned (description, expected output) pair owned by one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskTemplate {
    pub description: &'static str,
    pub expected_output: &'static str,
}

impl TaskTemplate {
    pub const fn new(description: &'static str, expected_output: &'static str) -> Self {
        Self {
            description,
            expected_output,
        }
    }
}

static COMPOSER_LYRICIST_TASKS: [TaskTemplate; 3] = [
    TaskTemplate::new("Compose new songs", "Sheet music and lyrics for all songs"),
    TaskTemplate::new("Develop musical themes", "Musical motifs for characters and scenes"),
    TaskTemplate::new("Create vocal arrangements", "Detailed vocal arrangements for ensemble"),
];

static BOOK_TASKS: [TaskTemplate; 3] = [
    TaskTemplate::new("Draft storyline", "Complete first draft of the book"),
    TaskTemplate::new("Character development", "Detailed character backgrounds and arcs"),
    TaskTemplate::new("Scene structure", "Scene-by-scene breakdown with transitions"),
];

static DIRECTOR_TASKS: [TaskTemplate; 3] = [
    TaskTemplate::new("Review creative inputs", "Provide feedback on creative direction"),
    TaskTemplate::new("Vision development", "Comprehensive production vision document"),
    TaskTemplate::new("Staging concepts", "Initial staging plans for key scenes"),
];

static CHOREOGRAPHER_TASKS: [TaskTemplate; 3] = [
    TaskTemplate::new("Develop choreography", "Choreography plans for musical numbers"),
    TaskTemplate::new("Movement patterns", "Character-specific movement guidelines"),
    TaskTemplate::new("Dance arrangements", "Dance break arrangements for ensemble numbers"),
];

static SET_VISUAL_TASKS: [TaskTemplate; 3] = [
    TaskTemplate::new("Design set sketches", "Mood boards and initial sketches"),
    TaskTemplate::new("Technical requirements", "Technical specifications for set pieces"),
    TaskTemplate::new("Visual continuity", "Scene transition and visual flow plans"),
];

static DRAMATURG_TASKS: [TaskTemplate; 3] = [
    TaskTemplate::new("Check continuity", "A list of suggested storyline adjustments"),
    TaskTemplate::new("Historical research", "Period-specific reference materials"),
    TaskTemplate::new("Theme analysis", "Analysis of major themes and motifs"),
];

static MARKET_PRODUCER_TASKS: [TaskTemplate; 3] = [
    TaskTemplate::new("Analyze market trends", "Market analysis report"),
    TaskTemplate::new("Budget planning", "Initial budget breakdown"),
    TaskTemplate::new("Marketing strategy", "Marketing and promotion plan"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_names_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::from_name(role.name()), Some(role));
        }
        assert_eq!(Role::from_name("Lighting"), None);
        assert_eq!(Role::from_name("director"), None);
    }

    #[test]
    fn test_declared_order() {
        let names: Vec<&str> = Role::ALL.iter().map(|r| r.name()).collect();
        assert_eq!(
            names,
            [
                "Composer + Lyricist",
                "Book",
                "Director",
                "Choreographer",
                "Set/Visual",
                "Dramaturg",
                "Market/Producer",
            ]
        );
    }

    #[test]
    fn test_every_role_has_three_tasks() {
        let total: usize = Role::ALL.iter().map(|r| r.task_templates().len()).sum();
        assert_eq!(total, 21);
        for role in Role::ALL {
            assert_eq!(role.task_templates().len(), 3, "{role}");
        }
        assert_eq!(
            Role::Dramaturg.task_templates()[0],
            TaskTemplate::new("Check continuity", "A list of suggested storyline adjustments")
        );
    }

    #[test]
    fn test_unknown_role_gets_generic_profile() {
        assert_eq!(profile_for_name("Lighting Designer"), GENERIC_PROFILE);
        assert!(templates_for_name("Lighting Designer").is_empty());
        assert_eq!(profile_for_name("Director"), Role::Director.profile());
        assert_ne!(Role::Director.profile(), GENERIC_PROFILE);
    }
}
