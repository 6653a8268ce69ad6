//! Seeds for physics, chemistry, biology and computer science

use super::SeedDefinition;

pub(super) const PHYSICS: &[SeedDefinition] = &[
    SeedDefinition {
        name: "Newton's First Law",
        subfield: "mechanics",
        complexity_level: 0,
        is_axiom: true,
        definition_md: r#"## Newton's First Law

A body stays at rest or in uniform straight-line motion unless a net external
force acts on it:

$$\mathbf{F}_{net} = 0 \implies \frac{d\mathbf{v}}{dt} = 0$$

Frames in which this holds are called **inertial**."#,
        books: &["Classical Mechanics - Goldstein", "Principia - Newton"],
        prerequisites: &[],
    },
    SeedDefinition {
        name: "Newton's Second Law",
        subfield: "mechanics",
        complexity_level: 0,
        is_axiom: true,
        definition_md: r#"## Newton's Second Law

The net force on a body equals the rate of change of its momentum:

$$\mathbf{F} = \frac{d\mathbf{p}}{dt}$$

For constant mass this reduces to $\mathbf{F} = m\mathbf{a}$."#,
        books: &["Classical Mechanics - Goldstein", "Principia - Newton"],
        prerequisites: &["Newton's First Law"],
    },
    SeedDefinition {
        name: "Conservation of Energy",
        subfield: "mechanics",
        complexity_level: 0,
        is_axiom: true,
        definition_md: r#"## Conservation of Energy

The total energy of an isolated system is constant in time:

$$\frac{dE_{total}}{dt} = 0$$

In mechanics $E_{total} = K + U$, kinetic plus potential energy."#,
        books: &["The Feynman Lectures on Physics, Vol. 1"],
        prerequisites: &[],
    },
];

pub(super) const CHEMISTRY: &[SeedDefinition] = &[
    SeedDefinition {
        name: "Dalton's Atomic Theory",
        subfield: "general",
        complexity_level: 0,
        is_axiom: true,
        definition_md: r#"## Dalton's Atomic Theory

Matter is made of atoms. Atoms of one element share their mass and
properties; compounds are fixed combinations of atoms of different elements;
a chemical reaction rearranges atoms without creating or destroying them:

$$m_{reactants} = m_{products}$$"#,
        books: &["Chemistry: The Central Science - Brown et al., Ch. 2"],
        prerequisites: &[],
    },
    SeedDefinition {
        name: "Atom",
        subfield: "general",
        complexity_level: 0,
        is_axiom: false,
        definition_md: r#"## Atom

An **atom** is the smallest unit of an element that keeps its chemical
properties. It has a nucleus of $Z$ protons and $N$ neutrons surrounded by
electrons; the mass number is $A = Z + N$."#,
        books: &["Chemistry: The Central Science - Brown et al., Ch. 2"],
        prerequisites: &["Dalton's Atomic Theory"],
    },
    SeedDefinition {
        name: "Mole",
        subfield: "general",
        complexity_level: 0,
        is_axiom: false,
        definition_md: r#"## Mole

One **mole** contains exactly $N_A = 6.02214076 \times 10^{23}$ elementary
entities. The amount of substance in a sample of mass $m$ is

$$n = \frac{m}{M}$$

where $M$ is the molar mass."#,
        books: &["Chemistry: The Central Science - Brown et al., Ch. 3"],
        prerequisites: &["Atom"],
    },
    SeedDefinition {
        name: "Chemical Bond",
        subfield: "general",
        complexity_level: 1,
        is_axiom: false,
        definition_md: r#"## Chemical Bond

A **chemical bond** is a lasting attraction between atoms that lowers the
energy of the combined system. Bonds are classed as **ionic** (electron
transfer), **covalent** (electron sharing) or **metallic** (delocalized
electrons)."#,
        books: &["General Chemistry - Pauling, Ch. 6"],
        prerequisites: &["Atom"],
    },
    SeedDefinition {
        name: "Electronegativity",
        subfield: "general",
        complexity_level: 1,
        is_axiom: false,
        definition_md: r#"## Electronegativity

**Electronegativity** $\chi$ measures how strongly an atom attracts shared
electrons. On the Pauling scale a difference $|\chi_A - \chi_B| > 1.7$
usually indicates an ionic bond."#,
        books: &["The Nature of the Chemical Bond - Pauling"],
        prerequisites: &["Chemical Bond"],
    },
    SeedDefinition {
        name: "Enthalpy",
        subfield: "physical",
        complexity_level: 0,
        is_axiom: false,
        definition_md: r#"## Enthalpy

**Enthalpy** is the state function

$$H = U + pV$$

At constant pressure the heat absorbed by a system equals $\Delta H$."#,
        books: &["Physical Chemistry - Atkins, Ch. 2"],
        prerequisites: &["Mole"],
    },
    SeedDefinition {
        name: "Gibbs Free Energy",
        subfield: "physical",
        complexity_level: 0,
        is_axiom: false,
        definition_md: r#"## Gibbs Free Energy

The **Gibbs free energy** is

$$G = H - TS$$

At constant temperature and pressure a process is spontaneous when
$\Delta G < 0$."#,
        books: &["Physical Chemistry - Atkins, Ch. 3"],
        prerequisites: &["Enthalpy"],
    },
    SeedDefinition {
        name: "Chemical Equilibrium",
        subfield: "physical",
        complexity_level: 1,
        is_axiom: false,
        definition_md: r#"## Chemical Equilibrium

A reaction is at **equilibrium** when forward and reverse rates are equal.
The equilibrium constant satisfies

$$\Delta G^\circ = -RT \ln K$$"#,
        books: &["Physical Chemistry - Atkins, Ch. 6"],
        prerequisites: &["Gibbs Free Energy"],
    },
    SeedDefinition {
        name: "Reaction Rate",
        subfield: "physical",
        complexity_level: 1,
        is_axiom: false,
        definition_md: r#"## Reaction Rate

For $aA + bB \to cC$ the **rate** is

$$r = -\frac{1}{a}\frac{d[A]}{dt} = \frac{1}{c}\frac{d[C]}{dt}$$

and often follows a rate law $r = k[A]^m[B]^n$."#,
        books: &["Chemical Kinetics - Laidler"],
        prerequisites: &["Mole"],
    },
    SeedDefinition {
        name: "Activation Energy",
        subfield: "physical",
        complexity_level: 1,
        is_axiom: false,
        definition_md: r#"## Activation Energy

The **activation energy** $E_a$ is the minimum energy reactants need to
react. It enters the Arrhenius equation

$$k = A e^{-E_a / RT}$$"#,
        books: &["Chemical Kinetics - Laidler"],
        prerequisites: &["Reaction Rate"],
    },
];

pub(super) const BIOLOGY: &[SeedDefinition] = &[
    SeedDefinition {
        name: "Cell Theory",
        subfield: "cell_biology",
        complexity_level: 0,
        is_axiom: true,
        definition_md: r#"## Cell Theory

1. All living organisms are made of one or more cells.
2. The cell is the basic unit of structure and function.
3. Every cell arises from a pre-existing cell (*omnis cellula e cellula*)."#,
        books: &["Molecular Biology of the Cell - Alberts", "Biology - Campbell"],
        prerequisites: &[],
    },
    SeedDefinition {
        name: "Central Dogma of Molecular Biology",
        subfield: "molecular_biology",
        complexity_level: 0,
        is_axiom: true,
        definition_md: r#"## Central Dogma of Molecular Biology

Sequence information flows from nucleic acid to protein:

$$\text{DNA} \xrightarrow{\text{transcription}} \text{RNA} \xrightarrow{\text{translation}} \text{Protein}$$

Reverse transcription in retroviruses is the classic exception."#,
        books: &["Molecular Biology of the Gene - Watson"],
        prerequisites: &[],
    },
    SeedDefinition {
        name: "Natural Selection",
        subfield: "evolution",
        complexity_level: 0,
        is_axiom: true,
        definition_md: r#"## Natural Selection

Heritable variation in traits that affect survival or reproduction changes
allele frequencies over generations. For one locus with selection
coefficient $s$,

$$\Delta p \approx s \, p (1 - p)$$"#,
        books: &["On the Origin of Species - Darwin", "Evolution - Futuyma"],
        prerequisites: &[],
    },
];

pub(super) const CS: &[SeedDefinition] = &[
    SeedDefinition {
        name: "Turing Machine",
        subfield: "theory_of_computation",
        complexity_level: 0,
        is_axiom: true,
        definition_md: r#"## Turing Machine

A **Turing machine** is a tuple $(Q, \Gamma, \delta, q_0, F)$ with a finite
state set $Q$, a tape alphabet $\Gamma$, and a transition function

$$\delta : Q \times \Gamma \to Q \times \Gamma \times \{L, R\}$$

acting on an unbounded tape through a read/write head."#,
        books: &["Introduction to the Theory of Computation - Sipser"],
        prerequisites: &[],
    },
    SeedDefinition {
        name: "Church-Turing Thesis",
        subfield: "theory_of_computation",
        complexity_level: 0,
        is_axiom: true,
        definition_md: r#"## Church-Turing Thesis

A function on the natural numbers is effectively computable if and only if
a Turing machine computes it. It is a thesis rather than a theorem because
"effectively computable" is informal."#,
        books: &["Introduction to the Theory of Computation - Sipser"],
        prerequisites: &["Turing Machine"],
    },
    SeedDefinition {
        name: "Big-O Notation",
        subfield: "algorithms",
        complexity_level: 1,
        is_axiom: false,
        definition_md: r#"## Big-O Notation

$f(n) \in O(g(n))$ when there are constants $c > 0$ and $n_0$ with

$$0 \leq f(n) \leq c \cdot g(n) \quad \text{for all } n \geq n_0$$

so $f$ grows no faster than $g$ asymptotically."#,
        books: &["Introduction to Algorithms - Cormen et al., Ch. 3"],
        prerequisites: &[],
    },
];
