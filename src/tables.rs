//! Fixed relations between planets, signs, nakshatras, weekdays and the
//! lucky attributes handed out for a ruling planet.
//!
//! Every lookup is an exhaustive `match`; adding a variant fails to compile
//! until its row is filled in.

use super::*;

/// Planetary-hour rotation, slowest to fastest.
pub const CHALDEAN_ORDER: [Planet; 7] = [
    Planet::Saturn,
    Planet::Jupiter,
    Planet::Mars,
    Planet::Sun,
    Planet::Venus,
    Planet::Mercury,
    Planet::Moon,
];

impl ZodiacSign {
    pub fn lord(self) -> Planet {
        match self {
            ZodiacSign::Aries | ZodiacSign::Scorpio => Planet::Mars,
            ZodiacSign::Taurus | ZodiacSign::Libra => Planet::Venus,
            ZodiacSign::Gemini | ZodiacSign::Virgo => Planet::Mercury,
            ZodiacSign::Cancer => Planet::Moon,
            ZodiacSign::Leo => Planet::Sun,
            ZodiacSign::Sagittarius | ZodiacSign::Pisces => Planet::Jupiter,
            ZodiacSign::Capricorn | ZodiacSign::Aquarius => Planet::Saturn,
        }
    }
}

impl Nakshatra {
    /// Vimshottari lord: the nine-planet cycle starting at Ketu, repeated
    /// three times around the zodiac.
    pub fn lord(self) -> Planet {
        match self {
            Nakshatra::Ashwini | Nakshatra::Magha | Nakshatra::Mula => Planet::Ketu,
            Nakshatra::Bharani | Nakshatra::PurvaPhalguni | Nakshatra::PurvaAshadha => Planet::Venus,
            Nakshatra::Krittika | Nakshatra::UttaraPhalguni | Nakshatra::UttaraAshadha => Planet::Sun,
            Nakshatra::Rohini | Nakshatra::Hasta | Nakshatra::Shravana => Planet::Moon,
            Nakshatra::Mrigashira | Nakshatra::Chitra | Nakshatra::Dhanishta => Planet::Mars,
            Nakshatra::Ardra | Nakshatra::Swati | Nakshatra::Shatabhisha => Planet::Rahu,
            Nakshatra::Punarvasu | Nakshatra::Vishakha | Nakshatra::PurvaBhadrapada => Planet::Jupiter,
            Nakshatra::Pushya | Nakshatra::Anuradha | Nakshatra::UttaraBhadrapada => Planet::Saturn,
            Nakshatra::Ashlesha | Nakshatra::Jyeshtha | Nakshatra::Revati => Planet::Mercury,
        }
    }
}

impl Weekday {
    pub fn lord(self) -> Planet {
        match self {
            Weekday::Sunday => Planet::Sun,
            Weekday::Monday => Planet::Moon,
            Weekday::Tuesday => Planet::Mars,
            Weekday::Wednesday => Planet::Mercury,
            Weekday::Thursday => Planet::Jupiter,
            Weekday::Friday => Planet::Venus,
            Weekday::Saturday => Planet::Saturn,
        }
    }

    /// Position of this day's lord in [`CHALDEAN_ORDER`]; the first hora
    /// after sunrise belongs to it.
    pub fn chaldean_offset(self) -> usize {
        match self {
            Weekday::Saturday => 0,
            Weekday::Thursday => 1,
            Weekday::Tuesday => 2,
            Weekday::Sunday => 3,
            Weekday::Friday => 4,
            Weekday::Wednesday => 5,
            Weekday::Monday => 6,
        }
    }
}

impl Direction {
    pub fn hindi(self) -> &'static str {
        match self {
            Direction::East => "पूर्व",
            Direction::West => "पश्चिम",
            Direction::North => "उत्तर",
            Direction::South => "दक्षिण",
            Direction::NorthEast => "ईशान",
            Direction::NorthWest => "वायव्य",
            Direction::SouthEast => "आग्नेय",
            Direction::SouthWest => "नैऋत्य",
        }
    }
}

impl Planet {
    pub fn exaltation(self) -> Option<ZodiacSign> {
        Some(match self {
            Planet::Sun => ZodiacSign::Aries,
            Planet::Moon => ZodiacSign::Taurus,
            Planet::Mars => ZodiacSign::Capricorn,
            Planet::Mercury => ZodiacSign::Virgo,
            Planet::Jupiter => ZodiacSign::Cancer,
            Planet::Venus => ZodiacSign::Pisces,
            Planet::Saturn => ZodiacSign::Libra,
            Planet::Rahu => ZodiacSign::Gemini,
            Planet::Ketu => ZodiacSign::Sagittarius,
        })
    }

    pub fn debilitation(self) -> Option<ZodiacSign> {
        Some(match self {
            Planet::Sun => ZodiacSign::Libra,
            Planet::Moon => ZodiacSign::Scorpio,
            Planet::Mars => ZodiacSign::Cancer,
            Planet::Mercury => ZodiacSign::Pisces,
            Planet::Jupiter => ZodiacSign::Capricorn,
            Planet::Venus => ZodiacSign::Virgo,
            Planet::Saturn => ZodiacSign::Aries,
            Planet::Rahu => ZodiacSign::Sagittarius,
            Planet::Ketu => ZodiacSign::Gemini,
        })
    }

    pub fn own_signs(self) -> &'static [ZodiacSign] {
        match self {
            Planet::Sun => &[ZodiacSign::Leo],
            Planet::Moon => &[ZodiacSign::Cancer],
            Planet::Mars => &[ZodiacSign::Aries, ZodiacSign::Scorpio],
            Planet::Mercury => &[ZodiacSign::Gemini, ZodiacSign::Virgo],
            Planet::Jupiter => &[ZodiacSign::Sagittarius, ZodiacSign::Pisces],
            Planet::Venus => &[ZodiacSign::Taurus, ZodiacSign::Libra],
            Planet::Saturn => &[ZodiacSign::Capricorn, ZodiacSign::Aquarius],
            Planet::Rahu => &[ZodiacSign::Aquarius],
            Planet::Ketu => &[ZodiacSign::Scorpio],
        }
    }

    /// Planets this one regards as friends. Not symmetric.
    pub fn friends(self) -> &'static [Planet] {
        match self {
            Planet::Sun => &[Planet::Moon, Planet::Mars, Planet::Jupiter],
            Planet::Moon => &[Planet::Sun, Planet::Mercury],
            Planet::Mars => &[Planet::Sun, Planet::Moon, Planet::Jupiter],
            Planet::Mercury => &[Planet::Sun, Planet::Venus],
            Planet::Jupiter => &[Planet::Sun, Planet::Moon, Planet::Mars],
            Planet::Venus => &[Planet::Mercury, Planet::Saturn],
            Planet::Saturn => &[Planet::Mercury, Planet::Venus],
            Planet::Rahu => &[Planet::Mercury, Planet::Venus, Planet::Saturn],
            Planet::Ketu => &[Planet::Mars, Planet::Venus, Planet::Saturn],
        }
    }

    /// Planets this one regards as enemies. Not symmetric.
    pub fn enemies(self) -> &'static [Planet] {
        match self {
            Planet::Sun => &[Planet::Venus, Planet::Saturn],
            Planet::Moon => &[],
            Planet::Mars => &[Planet::Mercury],
            Planet::Mercury => &[Planet::Moon],
            Planet::Jupiter => &[Planet::Mercury, Planet::Venus],
            Planet::Venus => &[Planet::Sun, Planet::Moon],
            Planet::Saturn => &[Planet::Sun, Planet::Moon, Planet::Mars],
            Planet::Rahu => &[Planet::Sun, Planet::Moon, Planet::Mars],
            Planet::Ketu => &[Planet::Sun, Planet::Moon],
        }
    }

    pub fn lucky_number(self) -> u8 {
        match self {
            Planet::Sun => 1,
            Planet::Moon => 2,
            Planet::Jupiter => 3,
            Planet::Rahu => 4,
            Planet::Mercury => 5,
            Planet::Venus => 6,
            Planet::Ketu => 7,
            Planet::Saturn => 8,
            Planet::Mars => 9,
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            Planet::Sun => Direction::East,
            Planet::Moon => Direction::NorthWest,
            Planet::Mars => Direction::South,
            Planet::Mercury => Direction::North,
            Planet::Jupiter | Planet::Ketu => Direction::NorthEast,
            Planet::Venus => Direction::SouthEast,
            Planet::Saturn => Direction::West,
            Planet::Rahu => Direction::SouthWest,
        }
    }

    pub fn lucky_color(self) -> LuckyColor {
        let (name, name_hi, hex) = match self {
            Planet::Sun => ("Gold", "सुनहरा", "#FFD700"),
            Planet::Moon => ("White", "सफ़ेद", "#F5F5F5"),
            Planet::Mars => ("Red", "लाल", "#E53935"),
            Planet::Mercury => ("Green", "हरा", "#43A047"),
            Planet::Jupiter => ("Yellow", "पीला", "#FDD835"),
            Planet::Venus => ("Pink", "गुलाबी", "#EC407A"),
            Planet::Saturn => ("Navy", "गहरा नीला", "#1A237E"),
            Planet::Rahu => ("Smoky Grey", "धुँआ-सा", "#607D8B"),
            Planet::Ketu => ("Maroon", "मैरून", "#6D4C41"),
        };
        LuckyColor {
            name: name.to_string(),
            name_hi: name_hi.to_string(),
            hex: hex.to_string(),
        }
    }

    pub fn mantra(self) -> Mantra {
        let (sanskrit, meaning) = match self {
            Planet::Sun => ("Om Suryaya Namah", "I lead with clarity."),
            Planet::Moon => ("Om Som Somaya Namah", "I stay calm and steady."),
            Planet::Mars => ("Om Mangalaya Namah", "I act with courage."),
            Planet::Mercury => ("Om Budhaya Namah", "My mind is sharp and clear."),
            Planet::Jupiter => ("Om Gurave Namah", "I choose wisdom."),
            Planet::Venus => ("Om Shukraya Namah", "I attract harmony."),
            Planet::Saturn => ("Om Sham Shanicharaya Namah", "I build with patience."),
            Planet::Rahu => ("Om Rahave Namah", "I stay aware and focused."),
            Planet::Ketu => ("Om Ketave Namah", "I let go and trust."),
        };
        Mantra {
            sanskrit: sanskrit.to_string(),
            meaning: meaning.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_weekday_lords_are_a_bijection() {
        let days = [
            Weekday::Sunday,
            Weekday::Monday,
            Weekday::Tuesday,
            Weekday::Wednesday,
            Weekday::Thursday,
            Weekday::Friday,
            Weekday::Saturday,
        ];
        let lords: HashSet<Planet> = days.iter().map(|d| d.lord()).collect();
        assert_eq!(lords.len(), 7);
        for day in days {
            assert_eq!(CHALDEAN_ORDER[day.chaldean_offset()], day.lord());
        }
    }

    #[test]
    fn test_lucky_numbers_cover_one_to_nine() {
        let mut numbers: Vec<u8> = Planet::iter().map(Planet::lucky_number).collect();
        numbers.sort_unstable();
        assert_eq!(numbers, (1..=9).collect::<Vec<u8>>());
    }

    #[test]
    fn test_exaltation_and_debilitation_are_disjoint() {
        for planet in Planet::iter() {
            assert_ne!(planet.exaltation(), planet.debilitation(), "{}", planet);
        }
    }

    #[test]
    fn test_nakshatra_lords_cycle_every_nine() {
        for nakshatra in Nakshatra::ALL {
            let next_cycle = Nakshatra::from_index(nakshatra.index() + 9);
            assert_eq!(nakshatra.lord(), next_cycle.lord());
        }
        assert_eq!(Nakshatra::Ashwini.lord(), Planet::Ketu);
        assert_eq!(Nakshatra::Revati.lord(), Planet::Mercury);
    }

    #[test]
    fn test_sun_attributes() {
        assert_eq!(Planet::Sun.lucky_number(), 1);
        assert_eq!(Planet::Sun.lucky_color().hex, "#FFD700");
        assert_eq!(Planet::Sun.direction(), Direction::East);
        assert_eq!(Direction::East.hindi(), "पूर्व");
    }
}
