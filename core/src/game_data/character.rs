use std::fmt;

use serde::{Deserialize, Serialize};

use super::stats::StatClass;

/// Character classes, including the avatar paths' fixed classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    SealClubber,
    TurtleTamer,
    Pastamancer,
    Sauceror,
    DiscoBandit,
    AccordionThief,
    AvatarOfBoris,
    AvatarOfJarlsberg,
    AvatarOfSneakyPete,
    Ed,
    Vampyre,
    Plumber,
    #[default]
    NotDefined,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 13] = [
        CharacterClass::SealClubber,
        CharacterClass::TurtleTamer,
        CharacterClass::Pastamancer,
        CharacterClass::Sauceror,
        CharacterClass::DiscoBandit,
        CharacterClass::AccordionThief,
        CharacterClass::AvatarOfBoris,
        CharacterClass::AvatarOfJarlsberg,
        CharacterClass::AvatarOfSneakyPete,
        CharacterClass::Ed,
        CharacterClass::Vampyre,
        CharacterClass::Plumber,
        CharacterClass::NotDefined,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            CharacterClass::SealClubber => "Seal Clubber",
            CharacterClass::TurtleTamer => "Turtle Tamer",
            CharacterClass::Pastamancer => "Pastamancer",
            CharacterClass::Sauceror => "Sauceror",
            CharacterClass::DiscoBandit => "Disco Bandit",
            CharacterClass::AccordionThief => "Accordion Thief",
            CharacterClass::AvatarOfBoris => "Avatar of Boris",
            CharacterClass::AvatarOfJarlsberg => "Avatar of Jarlsberg",
            CharacterClass::AvatarOfSneakyPete => "Avatar of Sneaky Pete",
            CharacterClass::Ed => "Ed",
            CharacterClass::Vampyre => "Vampyre",
            CharacterClass::Plumber => "Plumber",
            CharacterClass::NotDefined => "not defined",
        }
    }

    /// Main stat of the class. `None` for classes whose main stat is
    /// whichever is highest.
    pub const fn main_stat(self) -> Option<StatClass> {
        match self {
            CharacterClass::SealClubber
            | CharacterClass::TurtleTamer
            | CharacterClass::AvatarOfBoris
            | CharacterClass::NotDefined => Some(StatClass::Muscle),
            CharacterClass::Pastamancer
            | CharacterClass::Sauceror
            | CharacterClass::AvatarOfJarlsberg
            | CharacterClass::Ed
            | CharacterClass::Vampyre => Some(StatClass::Mysticality),
            CharacterClass::DiscoBandit
            | CharacterClass::AccordionThief
            | CharacterClass::AvatarOfSneakyPete => Some(StatClass::Moxie),
            CharacterClass::Plumber => None,
        }
    }

    pub fn from_name(name: &str) -> CharacterClass {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == name)
            .unwrap_or(CharacterClass::NotDefined)
    }

    /// Find the class named at the end of a line such as
    /// `Normal Hardcore Accordion Thief`.
    pub fn from_line_suffix(line: &str) -> CharacterClass {
        Self::ALL
            .into_iter()
            .filter(|c| *c != CharacterClass::NotDefined && line.ends_with(c.name()))
            .max_by_key(|c| c.name().len())
            .unwrap_or(CharacterClass::NotDefined)
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    Casual,
    Softcore,
    Hardcore,
    #[default]
    NotDefined,
}

impl GameMode {
    pub const fn name(self) -> &'static str {
        match self {
            GameMode::Casual => "Casual",
            GameMode::Softcore => "Softcore",
            GameMode::Hardcore => "Hardcore",
            GameMode::NotDefined => "not defined",
        }
    }

    /// Read the mode from an ascension declaration line. `Normal` without
    /// `Hardcore` is softcore.
    pub fn from_declaration(line: &str) -> GameMode {
        if line.contains("Hardcore") {
            GameMode::Hardcore
        } else if line.contains("Casual") {
            GameMode::Casual
        } else if line.contains("Softcore") || line.contains("Normal") {
            GameMode::Softcore
        } else {
            GameMode::NotDefined
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

macro_rules! ascension_paths {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Ascension paths, in release order.
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum AscensionPath {
            $($variant,)+
            #[default]
            NotDefined,
        }

        impl AscensionPath {
            pub const ALL: &'static [AscensionPath] = &[$(AscensionPath::$variant,)+];

            pub const fn name(self) -> &'static str {
                match self {
                    $(AscensionPath::$variant => $name,)+
                    AscensionPath::NotDefined => "not defined",
                }
            }
        }
    };
}

ascension_paths! {
    NoPath => "No-Path",
    Teetotaler => "Teetotaler",
    Boozetafarian => "Boozetafarian",
    Oxygenarian => "Oxygenarian",
    BeesHateYou => "Bees Hate You",
    WayOfTheSurprisingFist => "Way of the Surprising Fist",
    Trendy => "Trendy",
    AvatarOfBoris => "Avatar of Boris",
    BugbearInvasion => "Bugbear Invasion",
    ZombieSlayer => "Zombie Slayer",
    AvatarOfJarlsberg => "Avatar of Jarlsberg",
    Big => "BIG!",
    Kolhs => "KOLHS",
    ClassActII => "Class Act II: A Class For Pigs",
    ClassAct => "Class Act",
    AvatarOfSneakyPete => "Avatar of Sneaky Pete",
    SlowAndSteady => "Slow and Steady",
    HeavyRains => "Heavy Rains",
    Picky => "Picky",
    Standard => "Standard",
    ActuallyEd => "Actually Ed the Undying",
    OneCrazyRandomSummer => "One Crazy Random Summer",
    CommunityService => "Community Service",
    AvatarOfWestOfLoathing => "Avatar of West of Loathing",
    TheSource => "The Source",
    NuclearAutumn => "Nuclear Autumn",
    GelatinousNoob => "Gelatinous Noob",
    LicenseToAdventure => "License to Adventure",
    LiveAscendRepeat => "Live. Ascend. Repeat.",
    PocketFamiliars => "Pocket Familiars",
    GLover => "G-Lover",
    DisguisesDelimit => "Disguises Delimit",
    DarkGyffte => "Dark Gyffte",
    TwoCrazyRandomSummer => "Two Crazy Random Summer",
    KingdomOfExploathing => "Kingdom of Exploathing",
    Plumber => "Path of the Plumber",
}

impl AscensionPath {
    /// Exact name match first, then the longest known name the text starts
    /// with (so `Class Act II...` never resolves to `Class Act`).
    pub fn from_name(name: &str) -> AscensionPath {
        let name = name.trim();
        if let Some(path) = Self::ALL.iter().find(|p| p.name() == name) {
            return *path;
        }
        Self::ALL
            .iter()
            .filter(|p| name.starts_with(p.name()))
            .max_by_key(|p| p.name().len())
            .copied()
            .unwrap_or(AscensionPath::NotDefined)
    }
}

impl fmt::Display for AscensionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
