//! The seven starting locations with their NPCs and job boards.
//!
//! Location data is static; [`starting_locations`] turns it into mutable
//! [`Location`] records with empty occupancy and public memory.

use citysim_types::{Job, JobTask, Location, LocationKind, Npc, Skill};

use crate::error::WorldError;

/// Dense urban village; cheap and noisy housing.
pub const BAOAN_VILLAGE: &str = "Bao'an Village";
/// High-tech office cluster.
pub const NANSHAN_TECH_PARK: &str = "Nanshan Tech Park";
/// Financial district.
pub const FUTIAN_CBD: &str = "Futian CBD";
/// Electronics market.
pub const HUAQIANGBEI: &str = "Huaqiangbei";
/// Old shopping street with day labor; the fallback for evicted bots.
pub const DONGMEN_OLD_STREET: &str = "Dongmen Old Street";
/// Shared white-collar apartments.
pub const NANSHAN_APARTMENTS: &str = "Nanshan Apartments";
/// Seaside park.
pub const BAY_PARK: &str = "Shenzhen Bay Park";

/// Homes a newly spawned bot may be assigned.
pub const SPAWN_HOMES: [&str; 2] = [BAOAN_VILLAGE, NANSHAN_APARTMENTS];

struct TaskSpec {
    name: &'static str,
    duration: u32,
    difficulty: f64,
    desc: &'static str,
}

struct JobSpec {
    title: &'static str,
    skill: Option<Skill>,
    min_skill: u32,
    pay: u64,
    tasks: &'static [TaskSpec],
}

struct NpcSpec {
    name: &'static str,
    role: &'static str,
}

struct LocationSpec {
    name: &'static str,
    desc: &'static str,
    kind: LocationKind,
    jobs: &'static [JobSpec],
    npcs: &'static [NpcSpec],
}

const fn task(name: &'static str, duration: u32, difficulty: f64, desc: &'static str) -> TaskSpec {
    TaskSpec {
        name,
        duration,
        difficulty,
        desc,
    }
}

const fn npc(name: &'static str, role: &'static str) -> NpcSpec {
    NpcSpec { name, role }
}

const LOCATIONS: &[LocationSpec] = &[
    LocationSpec {
        name: BAOAN_VILLAGE,
        desc: "Handshake buildings packed wall to wall; cheap but noisy",
        kind: LocationKind::Residential,
        jobs: &[
            JobSpec {
                title: "Delivery rider",
                skill: None,
                min_skill: 0,
                pay: 35,
                tasks: &[
                    task("Deliver 3 orders", 2, 0.2, "Weave an e-bike through the village alleys"),
                    task("Deliver 5 orders at peak", 3, 0.4, "Lunch rush, tight deadlines"),
                ],
            },
            JobSpec {
                title: "Restaurant helper",
                skill: None,
                min_skill: 0,
                pay: 30,
                tasks: &[
                    task("Wash dishes and chop vegetables", 2, 0.1, "Help out in the back kitchen"),
                    task("Serve tables", 3, 0.2, "Carry dishes and clear tables out front"),
                ],
            },
            JobSpec {
                title: "Parcel sorter",
                skill: None,
                min_skill: 0,
                pay: 28,
                tasks: &[task("Sort 100 parcels", 2, 0.15, "Sort parcels at the courier station")],
            },
        ],
        npcs: &[
            npc("Sister Wang the landlady", "landlord"),
            npc("Old Li's breakfast stall", "vendor"),
            npc("Old Zhang the guard", "guard"),
        ],
    },
    LocationSpec {
        name: NANSHAN_TECH_PARK,
        desc: "Where the high-tech companies cluster",
        kind: LocationKind::Business,
        jobs: &[
            JobSpec {
                title: "Junior programmer",
                skill: Some(Skill::Tech),
                min_skill: 20,
                pay: 80,
                tasks: &[
                    task("Fix the login page bug", 3, 0.3, "Users report the login page sometimes goes blank"),
                    task("Write an API endpoint", 4, 0.4, "Build a new REST endpoint from the product brief"),
                    task("Do a code review", 2, 0.25, "Review a colleague's changes"),
                ],
            },
            JobSpec {
                title: "Product assistant",
                skill: Some(Skill::Social),
                min_skill: 15,
                pay: 60,
                tasks: &[
                    task("Collect user feedback", 2, 0.2, "Gather and sort feedback from every channel"),
                    task("Draw a prototype", 3, 0.35, "Mock up a new feature"),
                ],
            },
        ],
        npcs: &[npc("Xiao Chen from HR", "recruiter"), npc("Tired programmer", "passer-by")],
    },
    LocationSpec {
        name: FUTIAN_CBD,
        desc: "Financial centre, a forest of towers",
        kind: LocationKind::Business,
        jobs: &[
            JobSpec {
                title: "Finance intern",
                skill: Some(Skill::Social),
                min_skill: 25,
                pay: 70,
                tasks: &[
                    task("Compile report data", 3, 0.3, "Enter listed companies' figures into a spreadsheet"),
                    task("Sit in on a client meeting", 2, 0.2, "Take notes for the manager"),
                ],
            },
            JobSpec {
                title: "Sales rep",
                skill: Some(Skill::Social),
                min_skill: 20,
                pay: 55,
                tasks: &[
                    task("Make 50 cold calls", 3, 0.4, "Phone prospects and pitch the product"),
                    task("Follow up 3 leads", 2, 0.3, "Meet interested clients"),
                ],
            },
        ],
        npcs: &[npc("Manager Liu from the bank", "finance"), npc("Xiao Mei the intern", "intern")],
    },
    LocationSpec {
        name: HUAQIANGBEI,
        desc: "Electronics bazaar, crowded all day",
        kind: LocationKind::Commercial,
        jobs: &[
            JobSpec {
                title: "Electronics sales",
                skill: Some(Skill::Social),
                min_skill: 10,
                pay: 45,
                tasks: &[
                    task("Sell phone accessories", 2, 0.2, "Sell cases and cables at the counter"),
                    task("Assemble a PC", 3, 0.35, "Build a desktop to a customer's spec"),
                ],
            },
            JobSpec {
                title: "Livestream assistant",
                skill: Some(Skill::Social),
                min_skill: 15,
                pay: 50,
                tasks: &[
                    task("Set up the stream room", 2, 0.15, "Lights, products, test the gear"),
                    task("Help the host sell", 3, 0.3, "Hand over products and answer comments"),
                ],
            },
        ],
        npcs: &[npc("A Qiang the phone dealer", "trader"), npc("Tom the tourist", "tourist")],
    },
    LocationSpec {
        name: DONGMEN_OLD_STREET,
        desc: "Traditional shopping street with plenty of day labor",
        kind: LocationKind::Commercial,
        jobs: &[
            JobSpec {
                title: "Day porter",
                skill: None,
                min_skill: 0,
                pay: 40,
                tasks: &[
                    task("Unload a truck", 2, 0.25, "Carry goods from the truck into the shop"),
                    task("Tidy the warehouse", 3, 0.15, "Sort and shelve stock"),
                ],
            },
            JobSpec {
                title: "Flyer handout",
                skill: None,
                min_skill: 0,
                pay: 25,
                tasks: &[task("Hand out flyers for 2 hours", 2, 0.1, "Stand where the crowd is thickest")],
            },
        ],
        npcs: &[npc("Foreman Chen", "foreman"), npc("Vegetable granny", "vendor")],
    },
    LocationSpec {
        name: NANSHAN_APARTMENTS,
        desc: "Shared apartments for office workers",
        kind: LocationKind::Residential,
        jobs: &[JobSpec {
            title: "Housekeeping",
            skill: None,
            min_skill: 0,
            pay: 35,
            tasks: &[task("Clean 3 rooms", 2, 0.15, "Clean rooms for tenants")],
        }],
        npcs: &[npc("Xiao Liu the roommate", "neighbor")],
    },
    LocationSpec {
        name: BAY_PARK,
        desc: "Seaside park, good for walking and thinking",
        kind: LocationKind::Leisure,
        jobs: &[
            JobSpec {
                title: "Park cleaner",
                skill: None,
                min_skill: 0,
                pay: 25,
                tasks: &[task("Sweep the boardwalk", 2, 0.1, "Clear litter from the paths")],
            },
            JobSpec {
                title: "Street performer",
                skill: Some(Skill::Social),
                min_skill: 15,
                pay: 30,
                tasks: &[task("Perform for 2 hours", 2, 0.3, "Busk on the plaza for tips")],
            },
        ],
        npcs: &[npc("Jogging uncle", "passer-by"), npc("Couple shooting wedding photos", "passer-by")],
    },
];

/// Names of every location, in canonical order.
pub fn location_names() -> impl Iterator<Item = &'static str> {
    LOCATIONS.iter().map(|spec| spec.name)
}

/// Whether `name` is a known location.
pub fn is_known_location(name: &str) -> bool {
    LOCATIONS.iter().any(|spec| spec.name == name)
}

/// Look up a location name, returning an error for unknown names.
pub fn resolve_location(name: &str) -> Result<&'static str, WorldError> {
    LOCATIONS
        .iter()
        .find(|spec| spec.name.eq_ignore_ascii_case(name.trim()))
        .map(|spec| spec.name)
        .ok_or_else(|| WorldError::UnknownLocation(name.to_owned()))
}

fn build_job(spec: &JobSpec) -> Job {
    Job {
        title: spec.title.to_owned(),
        skill: spec.skill,
        min_skill: spec.min_skill,
        pay: spec.pay,
        tasks: spec
            .tasks
            .iter()
            .map(|t| JobTask {
                name: t.name.to_owned(),
                duration: t.duration,
                difficulty: t.difficulty,
                desc: t.desc.to_owned(),
            })
            .collect(),
    }
}

fn build_location(spec: &LocationSpec) -> Location {
    Location {
        name: spec.name.to_owned(),
        desc: spec.desc.to_owned(),
        kind: spec.kind,
        bots: Vec::new(),
        npcs: spec
            .npcs
            .iter()
            .map(|n| Npc {
                name: n.name.to_owned(),
                role: n.role.to_owned(),
                interaction_count: 0,
                attitude: String::new(),
            })
            .collect(),
        jobs: spec.jobs.iter().map(build_job).collect(),
        public_memory: Vec::new(),
        recent_events: Vec::new(),
        modifications: Vec::new(),
        vibe: String::from("ordinary"),
    }
}

/// Fresh location records for a new world.
pub fn starting_locations() -> Vec<Location> {
    LOCATIONS.iter().map(build_location).collect()
}
