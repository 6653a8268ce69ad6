use super::SeedDefinition;

pub(super) const SEEDS: &[SeedDefinition] = &[
    // ========== ZFC axioms ==========
    SeedDefinition {
        name: "Axiom of Extensionality",
        subfield: "set_theory",
        complexity_level: 0,
        is_axiom: true,
        definition_md: r#"## Axiom of Extensionality

Two sets are equal exactly when they have the same elements:

$$\forall A \, \forall B \, \big( \forall x \, (x \in A \iff x \in B) \implies A = B \big)$$

A set is determined by its members alone, so $\{1, 2, 3\} = \{3, 1, 2\}$."#,
        books: &[
            "Set Theory - Kenneth Kunen, Ch. 1",
            "Naive Set Theory - Paul Halmos, Ch. 1",
        ],
        prerequisites: &[],
    },
    SeedDefinition {
        name: "Axiom of Empty Set",
        subfield: "set_theory",
        complexity_level: 0,
        is_axiom: true,
        definition_md: r#"## Axiom of Empty Set

There is a set with no elements:

$$\exists A \, \forall x \, (x \notin A)$$

By extensionality it is unique and is written $\emptyset$. For every set $X$,
$\emptyset \subseteq X$."#,
        books: &["Naive Set Theory - Paul Halmos, Ch. 2"],
        prerequisites: &["Axiom of Extensionality"],
    },
    SeedDefinition {
        name: "Axiom of Pairing",
        subfield: "set_theory",
        complexity_level: 0,
        is_axiom: true,
        definition_md: r#"## Axiom of Pairing

For any sets $a$ and $b$ there is a set whose elements are exactly $a$ and $b$:

$$\forall a \, \forall b \, \exists C \, \forall x \, (x \in C \iff x = a \lor x = b)$$

It is written $\{a, b\}$. Taking $a = b$ gives the singleton $\{a\}$."#,
        books: &["Naive Set Theory - Paul Halmos, Ch. 3"],
        prerequisites: &["Axiom of Extensionality"],
    },
    SeedDefinition {
        name: "Axiom of Union",
        subfield: "set_theory",
        complexity_level: 0,
        is_axiom: true,
        definition_md: r#"## Axiom of Union

For any family of sets $\mathcal{F}$ there is a set containing exactly the
elements of the members of $\mathcal{F}$:

$$\forall \mathcal{F} \, \exists U \, \forall x \, \big(x \in U \iff \exists A \in \mathcal{F} \, (x \in A)\big)$$

Binary union is the special case $A \cup B = \bigcup \{A, B\}$."#,
        books: &["Set Theory - Kenneth Kunen, Ch. 1"],
        prerequisites: &["Axiom of Extensionality", "Axiom of Pairing"],
    },
    SeedDefinition {
        name: "Axiom of Power Set",
        subfield: "set_theory",
        complexity_level: 0,
        is_axiom: true,
        definition_md: r#"## Axiom of Power Set

For every set $A$ there is a set whose elements are exactly the subsets of $A$:

$$\forall A \, \exists P \, \forall x \, (x \in P \iff x \subseteq A)$$

It is written $\mathcal{P}(A)$. If $A$ is finite with $n$ elements then
$|\mathcal{P}(A)| = 2^n$."#,
        books: &["Naive Set Theory - Paul Halmos, Ch. 5"],
        prerequisites: &["Axiom of Extensionality", "Subset"],
    },
    SeedDefinition {
        name: "Axiom Schema of Specification",
        subfield: "set_theory",
        complexity_level: 0,
        is_axiom: true,
        definition_md: r#"## Axiom Schema of Specification

For every formula $\varphi(x)$ and every set $A$ there is a set of the elements
of $A$ satisfying $\varphi$:

$$\forall A \, \exists B \, \forall x \, \big(x \in B \iff (x \in A \land \varphi(x))\big)$$

It is written $\{x \in A : \varphi(x)\}$. Restricting comprehension to an
existing set avoids Russell's paradox."#,
        books: &["Set Theory - Kenneth Kunen, Ch. 1"],
        prerequisites: &["Axiom of Extensionality"],
    },
    SeedDefinition {
        name: "Axiom of Infinity",
        subfield: "set_theory",
        complexity_level: 0,
        is_axiom: true,
        definition_md: r#"## Axiom of Infinity

There is an inductive set, one that contains $\emptyset$ and is closed under
successor $S(x) = x \cup \{x\}$:

$$\exists I \, \big(\emptyset \in I \land \forall x \, (x \in I \implies x \cup \{x\} \in I)\big)$$

The smallest inductive set is $\omega$, the natural numbers."#,
        books: &["Set Theory - Kenneth Kunen, Ch. 1"],
        prerequisites: &["Axiom of Empty Set", "Axiom of Union", "Axiom of Pairing"],
    },
    SeedDefinition {
        name: "Axiom Schema of Replacement",
        subfield: "set_theory",
        complexity_level: 0,
        is_axiom: true,
        definition_md: r#"## Axiom Schema of Replacement

The image of a set under a definable function is a set. If $\varphi(x, y)$
defines a unique $y$ for each $x \in A$, then

$$\exists B \, \forall y \, \big(y \in B \iff \exists x \in A \, \varphi(x, y)\big)$$"#,
        books: &["Set Theory - Kenneth Kunen, Ch. 1"],
        prerequisites: &["Axiom of Extensionality"],
    },
    SeedDefinition {
        name: "Axiom of Regularity",
        subfield: "set_theory",
        complexity_level: 0,
        is_axiom: true,
        definition_md: r#"## Axiom of Regularity

Every non-empty set has an element disjoint from it:

$$\forall A \, \big(A \neq \emptyset \implies \exists x \in A \, (x \cap A = \emptyset)\big)$$

Consequently no set is a member of itself and there are no infinite
descending $\in$-chains."#,
        books: &["Set Theory - Kenneth Kunen, Ch. 1"],
        prerequisites: &["Axiom of Extensionality", "Set Intersection"],
    },
    SeedDefinition {
        name: "Axiom of Choice",
        subfield: "set_theory",
        complexity_level: 0,
        is_axiom: true,
        definition_md: r#"## Axiom of Choice

Every family of non-empty sets has a choice function:

$$\forall \mathcal{F} \, \big(\emptyset \notin \mathcal{F} \implies \exists f : \mathcal{F} \to \textstyle\bigcup \mathcal{F} \; \forall A \in \mathcal{F} \, (f(A) \in A)\big)$$

It is equivalent to Zorn's Lemma and to the well-ordering theorem."#,
        books: &[
            "Set Theory - Kenneth Kunen, Ch. 1",
            "The Axiom of Choice - Thomas Jech",
        ],
        prerequisites: &["Function", "Axiom of Union"],
    },
    // ========== Derived set theory ==========
    SeedDefinition {
        name: "Subset",
        subfield: "set_theory",
        complexity_level: 1,
        is_axiom: false,
        definition_md: r#"## Subset

$A$ is a **subset** of $B$ when every element of $A$ belongs to $B$:

$$A \subseteq B \iff \forall x \, (x \in A \implies x \in B)$$

$A \subsetneq B$ denotes a proper subset. By extensionality,
$A = B \iff A \subseteq B \land B \subseteq A$."#,
        books: &["Naive Set Theory - Paul Halmos, Ch. 1"],
        prerequisites: &["Axiom of Extensionality"],
    },
    SeedDefinition {
        name: "Set Intersection",
        subfield: "set_theory",
        complexity_level: 1,
        is_axiom: false,
        definition_md: r#"## Set Intersection

The **intersection** of $A$ and $B$ is the set of elements common to both:

$$A \cap B = \{x \in A : x \in B\}$$

$A$ and $B$ are **disjoint** when $A \cap B = \emptyset$."#,
        books: &["Naive Set Theory - Paul Halmos, Ch. 4"],
        prerequisites: &["Axiom Schema of Specification"],
    },
    SeedDefinition {
        name: "Set Difference",
        subfield: "set_theory",
        complexity_level: 1,
        is_axiom: false,
        definition_md: r#"## Set Difference

The **difference** $A \setminus B$ is the set of elements of $A$ not in $B$:

$$A \setminus B = \{x \in A : x \notin B\}$$"#,
        books: &["Naive Set Theory - Paul Halmos, Ch. 5"],
        prerequisites: &["Axiom Schema of Specification"],
    },
    SeedDefinition {
        name: "Ordered Pair",
        subfield: "set_theory",
        complexity_level: 1,
        is_axiom: false,
        definition_md: r#"## Ordered Pair

The Kuratowski **ordered pair** of $a$ and $b$ is

$$(a, b) = \{\{a\}, \{a, b\}\}$$

Its defining property is $(a, b) = (c, d) \iff a = c \land b = d$."#,
        books: &["Naive Set Theory - Paul Halmos, Ch. 6"],
        prerequisites: &["Axiom of Pairing"],
    },
    SeedDefinition {
        name: "Cartesian Product",
        subfield: "set_theory",
        complexity_level: 1,
        is_axiom: false,
        definition_md: r#"## Cartesian Product

The **Cartesian product** of $A$ and $B$ is the set of ordered pairs

$$A \times B = \{(a, b) : a \in A \land b \in B\}$$

It exists as a subset of $\mathcal{P}(\mathcal{P}(A \cup B))$."#,
        books: &["Naive Set Theory - Paul Halmos, Ch. 6"],
        prerequisites: &["Ordered Pair", "Axiom of Power Set"],
    },
    SeedDefinition {
        name: "Relation",
        subfield: "set_theory",
        complexity_level: 1,
        is_axiom: false,
        definition_md: r#"## Relation

A **relation** from $A$ to $B$ is a subset $R \subseteq A \times B$. We write
$a \, R \, b$ for $(a, b) \in R$.

A relation on $A$ is a subset of $A \times A$."#,
        books: &["Naive Set Theory - Paul Halmos, Ch. 7"],
        prerequisites: &["Cartesian Product", "Subset"],
    },
    SeedDefinition {
        name: "Function",
        subfield: "set_theory",
        complexity_level: 1,
        is_axiom: false,
        definition_md: r#"## Function

A **function** $f : A \to B$ is a relation $f \subseteq A \times B$ such that
each element of $A$ is related to exactly one element of $B$:

$$\forall a \in A \; \exists! \, b \in B \; (a, b) \in f$$

$A$ is the **domain** and $B$ the **codomain** of $f$."#,
        books: &["Naive Set Theory - Paul Halmos, Ch. 8"],
        prerequisites: &["Relation", "Cartesian Product"],
    },
    SeedDefinition {
        name: "Equivalence Relation",
        subfield: "set_theory",
        complexity_level: 1,
        is_axiom: false,
        definition_md: r#"## Equivalence Relation

A relation $\sim$ on $A$ is an **equivalence relation** if it is reflexive,
symmetric and transitive:

$$a \sim a, \qquad a \sim b \implies b \sim a, \qquad (a \sim b \land b \sim c) \implies a \sim c$$

Its equivalence classes $[a] = \{x \in A : x \sim a\}$ partition $A$."#,
        books: &["Naive Set Theory - Paul Halmos, Ch. 7"],
        prerequisites: &["Relation"],
    },
    SeedDefinition {
        name: "Partial Order",
        subfield: "order_theory",
        complexity_level: 1,
        is_axiom: false,
        definition_md: r#"## Partial Order

A relation $\leq$ on $P$ is a **partial order** if it is reflexive,
antisymmetric and transitive:

$$a \leq a, \qquad (a \leq b \land b \leq a) \implies a = b, \qquad (a \leq b \land b \leq c) \implies a \leq c$$"#,
        books: &["Introduction to Lattices and Order - Davey & Priestley, Ch. 1"],
        prerequisites: &["Relation"],
    },
    SeedDefinition {
        name: "Well-Ordering",
        subfield: "order_theory",
        complexity_level: 2,
        is_axiom: false,
        definition_md: r#"## Well-Ordering

A total order $<$ on $A$ is a **well-ordering** if every non-empty subset of
$A$ has a least element:

$$\forall S \subseteq A \, \big(S \neq \emptyset \implies \exists m \in S \; \forall s \in S \, (m \leq s)\big)$$"#,
        books: &["Set Theory - Kenneth Kunen, Ch. 1"],
        prerequisites: &["Partial Order", "Axiom of Choice"],
    },
    SeedDefinition {
        name: "Natural Numbers",
        subfield: "set_theory",
        complexity_level: 2,
        is_axiom: false,
        definition_md: r#"## Natural Numbers

The **natural numbers** $\mathbb{N} = \omega$ form the smallest inductive set:

$$\omega = \bigcap \{I : I \text{ is inductive}\}$$

with $0 = \emptyset$ and $n + 1 = n \cup \{n\}$."#,
        books: &["Naive Set Theory - Paul Halmos, Ch. 11"],
        prerequisites: &["Axiom of Infinity", "Set Intersection"],
    },
];
