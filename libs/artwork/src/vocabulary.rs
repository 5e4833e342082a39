//! Closed vocabularies of the artwork catalog taxonomy
//!
//! The terms are owned by the catalog's content taxonomy. Adding or retiring a
//! term is a change to these tables only; the validator reads them as data.

use common::validation::Vocabulary;

pub const CATEGORIES: Vocabulary = Vocabulary::new(
    "category",
    &[
        "Collage",
        "Drawing",
        "Installation",
        "Mixed Media",
        "Painting",
        "Photography",
        "Printmaking",
        "Sculpture",
        "Digital",
    ],
);

pub const SUBJECTS: Vocabulary = Vocabulary::new(
    "subject",
    &[
        "Abstract",
        "Aerial",
        "Aeroplane",
        "Airplane",
        "Animal",
        "Architecture",
        "Automobile",
        "Beach",
        "Bicycle",
        "Bike",
        "Boat",
        "Body",
        "Botanic",
        "Business",
        "Calligraphy",
        "Car",
        "Cartoon",
        "Cats",
        "Celebrity",
        "Children",
        "Cinema",
        "Cities",
        "Classical mythology",
        "Comics",
        "Cows",
        "Cuisine",
        "Culture",
        "Dogs",
        "Education",
        "Erotic",
        "Family",
        "Fantasy",
        "Fashion",
        "Fish",
        "Floral",
        "Food",
        "Food & Drink",
        "Garden",
        "Geometric",
        "Graffiti",
        "Health & Beauty",
        "Home",
        "Horse",
        "Humor",
        "Interiors",
        "Kids",
        "Kitchen",
        "Landscape",
        "Language",
        "Light",
        "Love",
        "Men",
        "Mortality",
        "Motor",
        "Motorbike",
        "Motorcycle",
        "Music",
        "Nature",
        "Nude",
        "Outer Space",
        "Patterns",
        "People",
        "Performing Arts",
        "Places",
        "Political",
        "Politics",
        "Pop Culture/Celebrity",
        "Popular culture",
        "Portrait",
        "Religion",
        "Religious",
        "Rural life",
        "Sailboat",
        "Science",
        "Science/Technology",
        "Seascape",
        "Seasons",
        "Ship",
        "Sport",
        "Sports",
        "Still Life",
        "Technology",
        "Time",
        "Train",
        "Transportation",
        "Travel",
        "Tree",
        "Typography",
        "Wall",
        "Water",
        "Women",
        "World Culture",
        "Yacht",
    ],
);

pub const STYLES: Vocabulary = Vocabulary::new(
    "style",
    &[
        "3D Sculpture",
        "Abstract",
        "Abstract Expressionism",
        "Art Deco",
        "Conceptual",
        "Contemporary",
        "Cubism",
        "Dada",
        "Documentary",
        "Expressionism",
        "Figurative",
        "Fine Art",
        "Folk",
        "Fractal/Algorithmic",
        "Gaming",
        "Generative",
        "Glitch",
        "Graphics and Animation",
        "Illustration",
        "Impressionism",
        "Minimalism",
        "Modern",
        "Photorealism",
        "Pop Art",
        "Portraiture",
        "Realism",
        "Street Art",
        "Surrealism",
    ],
);

pub const MEDIUMS: Vocabulary = Vocabulary::new(
    "medium",
    &[
        "3D Sculpting",
        "Acrylic",
        "Airbrush",
        "Algorithmic Art",
        "Aquatint",
        "Ballpoint Pen",
        "Black & White",
        "Bronze",
        "C-type",
        "Ceramic",
        "Chalk",
        "Charcoal",
        "Clay",
        "Color",
        "Colored Pencil",
        "Conte",
        "Crayon",
        "Decoupage",
        "Digital",
        "Drypoint",
        "Dye Transfer",
        "Enamel",
        "Encaustic",
        "Engraving",
        "Environmental",
        "Etching",
        "Fabric",
        "Fiber",
        "Fiberglass",
        "Found Objects",
        "Fractal",
        "Full spectrum",
        "Gelatin",
        "Gesso",
        "Giclée",
        "Glass",
        "Gouache",
        "Granite",
        "Graphite",
        "Household",
        "Ink",
        "Interactive",
        "Kinetic",
        "Latex",
        "Leather",
        "LED",
        "Lenticular",
        "Lights",
        "Linocuts",
        "Lithograph",
        "Manipulated",
        "Marble",
        "Marker",
        "Metal",
        "Mezzotint",
        "Mixed Media",
        "Monotype",
        "Mosaic",
        "Moving Images",
        "Neon",
        "NFT",
        "Oil",
        "Paint",
        "Paper",
        "Paper mache",
        "Pastel",
        "Pen and Ink",
        "Pencil",
        "Photo",
        "Photogram",
        "Photography",
        "Pinhole",
        "Plaster",
        "Plastic",
        "Platinum",
        "Polaroid",
        "Pottery",
        "Precious Materials",
        "Resin",
        "Robotics",
        "Rubber",
        "Screenprinting",
        "Silverpoint",
        "Sound",
        "Spray Paint",
        "Steel",
        "Stencil",
        "Stone",
        "Taxidermy",
        "Tempera",
        "Textile",
        "Timber",
        "Vector",
        "Video",
        "Watercolor",
        "Wax",
        "Wood",
        "Woodcut",
    ],
);

/// Physical materials an artwork is made of
pub const MATERIALS: Vocabulary = Vocabulary::new(
    "material",
    &[
        "Aluminium",
        "Bronze",
        "Canvas",
        "Carbon Fibre",
        "Cardboard",
        "Ceramic",
        "Glass",
        "Iron",
        "Marble",
        "Paper",
        "Plastic",
        "Soft (Yarn, Cotton, Fabric)",
        "Sound",
        "Stainless Steel",
        "Steel",
        "Stone",
        "Wood",
        "Other",
    ],
);

/// Substrates a product variant is printed on; originals carry an empty material
pub const PRODUCT_MATERIALS: Vocabulary = Vocabulary::new(
    "product material",
    &["Fine Art Paper", "Photo Paper", "Canvas", ""],
);

pub const FRAME_COLORS: Vocabulary = Vocabulary::new(
    "frame color",
    &["black", "brown", "white", "silver", "gold", "patina", "other"],
);

pub const PACKAGING_OPTIONS: Vocabulary =
    Vocabulary::new("packaging option", &["rolled", "flat_cardboard", "flat_crate"]);

pub const VISIBILITIES: Vocabulary = Vocabulary::new("visibility", &["published", "draft"]);
