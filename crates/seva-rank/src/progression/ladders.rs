use super::domain::{RankTier, TierPresentation};

fn tier(
    name: &str,
    points_required: u64,
    icon: &str,
    color: &str,
    lore: &str,
    perks: [&str; 3],
    unlocks: [&str; 3],
) -> RankTier {
    RankTier::new(name, points_required).with_presentation(TierPresentation {
        icon: icon.to_string(),
        color: color.to_string(),
        lore: lore.to_string(),
        perks: perks.iter().map(|perk| perk.to_string()).collect(),
        unlocks: unlocks.iter().map(|unlock| unlock.to_string()).collect(),
    })
}

pub(crate) fn swarajya_tiers() -> Vec<RankTier> {
    vec![
        tier(
            "Sevak",
            0,
            "🙏",
            "#9E9E9E",
            "Seva is your first step toward Swarajya.",
            ["Create seva posts", "Join community", "Earn seva points"],
            ["Basic profile", "Feed access", "Help requests"],
        ),
        tier(
            "Mavla",
            10,
            "⚔️",
            "#795548",
            "Born from the mountains. Built for courage.",
            [
                "Bronze badge",
                "Create events (up to 2/month)",
                "Priority support",
            ],
            ["Event creation", "Advanced search", "Custom profile theme"],
        ),
        tier(
            "Talveer",
            100,
            "🗡️",
            "#607D8B",
            "Sharpening skills. Rising with purpose.",
            ["Silver badge", "Create events (up to 5/month)", "Featured posts"],
            ["Sword badge", "Event management tools", "Analytics dashboard"],
        ),
        tier(
            "Yoddha",
            250,
            "🛡️",
            "#3F51B5",
            "Every battle makes you stronger.",
            ["Gold badge", "Unlimited events", "Mentor access"],
            ["Warrior shield", "Team creation", "Custom banners"],
        ),
        tier(
            "Shiledar",
            1_000,
            "🏇",
            "#9C27B0",
            "Ride with honor. Fight with fire.",
            ["Purple cavalry badge", "Verified checkmark", "Top visibility"],
            ["Leadership board", "Mentor program", "Event promotion"],
        ),
        tier(
            "Bargir",
            5_000,
            "⚜️",
            "#E91E63",
            "Discipline creates legends.",
            ["Platinum badge", "Priority event placement", "Custom flair"],
            [
                "Regional leadership",
                "Campaign creation",
                "Advanced analytics",
            ],
        ),
        tier(
            "Daryaveer",
            10_000,
            "🌊",
            "#2196F3",
            "Fearless on land. Unstoppable at sea.",
            [
                "Diamond naval badge",
                "State-wide recognition",
                "Media features",
            ],
            ["Naval campaigns", "Regional influence", "VIP networking"],
        ),
        tier(
            "Gadkari",
            25_000,
            "🏰",
            "#FF6F00",
            "Guard the fort. Protect the legacy.",
            [
                "Ruby fort badge",
                "National recognition",
                "Exclusive events",
            ],
            ["State campaigns", "Press releases", "Partnership portal"],
        ),
        tier(
            "Senapati",
            50_000,
            "⚡",
            "#F44336",
            "Lead with strategy. Win with courage.",
            [
                "Emerald commander badge",
                "Lifetime achievement",
                "Legacy program",
            ],
            ["National campaigns", "Legacy projects", "Hall of fame"],
        ),
        tier(
            "Chhava",
            100_000,
            "🔱",
            "#FFD700",
            "Born a warrior. Rise as a legend.",
            [
                "Golden Trident badge",
                "Immortal status",
                "Monument dedication",
            ],
            ["Lifetime membership", "Historical archive", "Eternal legacy"],
        ),
    ]
}

pub(crate) fn classic_tiers() -> Vec<RankTier> {
    [
        ("Sevak", 0, "#6B7280"),
        ("Karyakarta", 500, "#3B82F6"),
        ("Nayak", 1_000, "#10B981"),
        ("Sardar", 1_500, "#8B5CF6"),
        ("Senapati", 2_000, "#FF6F00"),
    ]
    .into_iter()
    .map(|(name, points_required, color)| {
        RankTier::new(name, points_required).with_presentation(TierPresentation {
            color: color.to_string(),
            ..TierPresentation::default()
        })
    })
    .collect()
}
