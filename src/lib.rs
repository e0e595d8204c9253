pub mod core;
pub mod storage;
pub mod search;
pub mod lookup;
pub mod site;
pub mod app;

/*
┌──────────────────────────────────────────────────────────────────────────────┐
│                         MOVIEDEX STRUCT ARCHITECTURE                          │
└──────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────── APP LAYER ───────────────────────────────────┐
│  struct App<R: BufRead, W: Write>                                             │
│  • db: MovieDatabase                 // owned store handle                     │
│  • lookup: Option<Box<dyn MovieLookup>>  // OMDb, or offline input             │
│  • painter: Painter                  // crossterm colors                       │
│  • rng: StdRng                       // random pick                            │
└───────────────────────────────────────────────────────────────────────────────┘
           │ list() snapshot                        │ add / delete / update
           ▼                                        ▼
┌──────── DERIVED VIEWS (pure) ────────┐  ┌──────────── CORE LAYER ──────────────┐
│ core::stats                           │  │ struct MovieDatabase                  │
│ • average_rating / median_rating      │  │ • config: Config                      │
│   -> RatingStat { Computed | NoData } │  │ • storage: StorageLayout              │
│ • best_rated / worst_rated            │  │ • writer: Mutex<WAL>  // one writer   │
│   -> RatedTitles { titles, rating }   │  │ • _lock: FileLock     // flock        │
│ search                                │  │                                       │
│ • exact_search  -> Iterator<SearchHit>│  │ MovieRecord { title, details }        │
│ • fuzzy_search  -> Vec<FuzzyMatch>    │  │ MovieDetails { year, rating, poster } │
│   (TopKCollector, stable ties)        │  │ Rating(f64) in [0, 10]                │
│ site::render_site                     │  │ Collection = IndexMap<title, details> │
└───────────────────────────────────────┘  └───────────────────────────────────────┘
                                                             │
┌──────────────────────────────── STORAGE LAYER ───────────────────────────────┐
│  base/meta/checkpoint.bin   Checkpoint { sequence, records, checksum }         │
│  base/wal/wal_<seq>.log     [len u32][crc32 u32][bincode WALEntry] ...         │
│  base/.lock                 exclusive flock while open                         │
│                                                                               │
│  read  = checkpoint(seq) + replay(wal_<seq>)                                   │
│  write = append one WALEntry; fold into checkpoint(seq + 1) every N entries    │
└───────────────────────────────────────────────────────────────────────────────┘
*/
