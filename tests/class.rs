mod common;

use common::run_source;

#[test]
fn empty_class_prints_its_name() {
    let (stdout, stderr, ok) = run_source("class Foo {} print Foo;");
    assert!(ok, "{stderr}");
    assert_eq!(stdout, "<class Foo>\n");
}

#[test]
fn instances_have_fields_and_methods() {
    let (stdout, stderr, ok) = run_source(
        r#"
        class Bacon {
            eat() {
                print "Crunch crunch crunch!";
            }
        }
        var bacon = Bacon();
        bacon.flavor = "smoky";
        print bacon.flavor;
        bacon.eat();
        "#,
    );
    assert!(ok, "{stderr}");
    assert_eq!(stdout, "smoky\nCrunch crunch crunch!\n");
}

#[test]
fn constructor_is_the_method_named_after_the_class() {
    let (stdout, stderr, ok) = run_source(
        r#"
        class Point {
            Point(x, y) {
                this.x = x;
                this.y = y;
            }
            sum() {
                return this.x + this.y;
            }
        }
        var p = Point(1, 2);
        print p.sum();
        "#,
    );
    assert!(ok, "{stderr}");
    assert_eq!(stdout, "3\n");
}

#[test]
fn constructor_cannot_return_a_value() {
    let (_, stderr, ok) = run_source(
        r#"
        class Foo {
            Foo() {
                return 1;
            }
        }
        "#,
    );
    assert!(!ok);
    assert!(stderr.contains("Cannot return a value from a constructor."), "{stderr}");
}

#[test]
fn getter_is_invoked_without_parentheses() {
    let (stdout, stderr, ok) = run_source(
        r#"
        class Circle {
            Circle(radius) {
                this.radius = radius;
            }
            area {
                return 3.14159 * this.radius * this.radius;
            }
        }
        print Circle(2).area;
        "#,
    );
    assert!(ok, "{stderr}");
    assert_eq!(stdout, "12.56636\n");
}

#[test]
fn static_method_is_not_inherited() {
    let (_, stderr, ok) = run_source(
        r#"
        class Base {
            class make() {
                return "base";
            }
        }
        class Derived < Base {}
        print Derived.make();
        "#,
    );
    assert!(!ok);
    assert!(stderr.contains("Undefined property 'make'."), "{stderr}");
}

#[test]
fn static_method_is_callable_on_the_class_itself() {
    let (stdout, stderr, ok) = run_source(
        r#"
        class Math {
            class square(n) {
                return n * n;
            }
        }
        print Math.square(4);
        "#,
    );
    assert!(ok, "{stderr}");
    assert_eq!(stdout, "16\n");
}

#[test]
fn inheritance_shares_methods_and_super_calls_the_parent() {
    let (stdout, stderr, ok) = run_source(
        r#"
        class Doughnut {
            cook() {
                print "Fry until golden brown.";
            }
        }
        class BostonCream < Doughnut {
            cook() {
                super.cook();
                print "Pipe full of custard and coat with chocolate.";
            }
        }
        BostonCream().cook();
        "#,
    );
    assert!(ok, "{stderr}");
    assert_eq!(stdout, "Fry until golden brown.\nPipe full of custard and coat with chocolate.\n");
}

#[test]
fn class_cannot_inherit_from_itself() {
    let (_, stderr, ok) = run_source("class Foo < Foo {}");
    assert!(!ok);
    assert!(stderr.contains("A class cannot inherit from itself."), "{stderr}");
}

#[test]
fn this_outside_a_class_is_a_resolve_error() {
    let (_, stderr, ok) = run_source("print this;");
    assert!(!ok);
    assert!(stderr.contains("Cannot use 'this' outside of a class."), "{stderr}");
}

#[test]
fn this_inside_a_static_method_is_a_resolve_error() {
    let (_, stderr, ok) = run_source(
        r#"
        class Foo {
            class bar() {
                print this;
            }
        }
        "#,
    );
    assert!(!ok);
    assert!(stderr.contains("Cannot use 'this' in a static method."), "{stderr}");
}

#[test]
fn accessing_an_undefined_property_is_a_runtime_error() {
    let (_, stderr, ok) = run_source("class Foo {} print Foo().bar;");
    assert!(!ok);
    assert!(stderr.contains("Undefined property 'bar'."), "{stderr}");
}
