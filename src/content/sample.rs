//! Starter content for an empty store

pub(crate) const SAMPLE_CATEGORIES: &[&str] = &["Technology", "Rust", "Daily Life", "Study", "Projects"];

/// `(title, body, index into SAMPLE_CATEGORIES)`
pub(crate) const SAMPLE_POSTS: &[(&str, &str, usize)] = &[
    (
        "Welcome to the blog!",
        "This blog keeps its posts in a small embedded store. It has \
         categories, search and pagination, all in a few hundred lines.",
        4,
    ),
    (
        "What is a database?",
        "Databases are like spreadsheets with super powers. They keep \
         information organized and permanent. Ours lives in a single file.",
        0,
    ),
    (
        "First steps with Rust",
        "I started with println! and variables. Then came loops, vectors \
         and functions, then modules, and now a storage engine.",
        1,
    ),
    (
        "CRUD: the four essential operations",
        "CRUD stands for Create, Read, Update and Delete. Social networks \
         use it for posts, shops use it for products, and this blog uses it \
         for its texts.",
        3,
    ),
    (
        "Ownership for beginners",
        "Every value has one owner. Borrow it with & when you only need to \
         look, and with &mut when you need to change it.",
        1,
    ),
    (
        "Tips for studying programming",
        "1) Practice every day, even for 15 minutes.\n\
         2) Do not fear mistakes, they are teachers.\n\
         3) Read error messages calmly.\n\
         4) Help your peers, teaching is the best way to learn.\n\
         5) Build your own projects.",
        3,
    ),
    (
        "How does the internet work?",
        "When you open a site, your browser sends an HTTP request to a \
         server. The server queries its database if needed and answers \
         with a page for the browser to render.",
        0,
    ),
    (
        "Relationships between tables",
        "A user has many posts, and here a category has many posts. That is \
         a one-to-many relationship, enforced with a foreign key.",
        0,
    ),
    (
        "A weekend of programming",
        "I spent Saturday adding categories, search and pagination. Seeing \
         it all work is rewarding. On Sunday I rested.",
        2,
    ),
    (
        "Next steps: authentication and deploy",
        "The blog is almost complete. Next comes user sign-up and login, \
         and after that putting it online for anyone to read.",
        4,
    ),
    (
        "HTML and CSS: the foundation",
        "HTML is the skeleton of a page and CSS is its clothing. Together \
         they build pages every browser understands.",
        0,
    ),
    (
        "Why is Rust so loved?",
        "Memory safety without a garbage collector, a helpful compiler, \
         great tooling and a friendly community.",
        1,
    ),
];
