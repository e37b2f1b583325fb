#![allow(non_snake_case)]

use super::*;
use crate::test_support::{self, BUFFER, COIN, COLOR, EMPTY, POINT, SIGNER, WIDGET};

fn helper() -> JniHelper {
    JniHelper::new("wallet.core.jni")
}

fn render(source: &str, name: &str) -> String {
    test_support::render(&helper(), &test_support::unit(source, name))
}

// format_name / type_name tests

#[test]
fn JniHelper___format_name___mangles_java_name() {
    let helper = helper();

    assert_eq!(helper.format_name("Equal"), "equals");
    assert_eq!(helper.format_name("Package"), "package_1");
    assert_eq!(helper.format_name("HDWallet"), "hdWallet");
}

#[test]
fn JniHelper___type_name___uses_jni_types() {
    let helper = helper();

    assert_eq!(helper.type_name(&TypeDecl::Bytes { nullable: false }).unwrap(), "jbyteArray");
    assert_eq!(helper.type_name(&TypeDecl::Str { nullable: true }).unwrap(), "jstring");
    assert_eq!(helper.type_name(&TypeDecl::Size).unwrap(), "jlong");
    assert_eq!(
        helper
            .type_name(&TypeDecl::Enum {
                name: "Coin".to_string()
            })
            .unwrap(),
        "jobject"
    );
}

#[test]
fn JniHelper___arguments___names_converted_locals() {
    let params = vec![
        Parameter::new("name", TypeDecl::Str { nullable: false }),
        Parameter::new("data", TypeDecl::Bytes { nullable: false }),
        Parameter::new("coin", TypeDecl::Enum { name: "Coin".to_string() }),
        Parameter::new("index", TypeDecl::from_primitive("uint32_t").unwrap()),
    ];

    let arguments = helper().arguments(&params).unwrap();

    assert_eq!(arguments, "nameString, dataData, (enum TWCoin) coinValue, (uint32_t) index");
}

// rendering tests

#[test]
fn JniHelper___property___reads_native_handle() {
    let out = render(WIDGET, "Widget");

    assert!(out.contains("#include <TrustWalletCore/TWWidget.h>\n"));
    assert!(out.contains(
        "/// Number of parts.\n\
         JNIEXPORT jint JNICALL Java_wallet_core_jni_Widget_count(JNIEnv *env, jobject thisObject) {\n\
         \x20   jclass thisClass = (*env)->GetObjectClass(env, thisObject);\n\
         \x20   jfieldID thisHandleFieldID = (*env)->GetFieldID(env, thisClass, \"nativeHandle\", \"J\");\n\
         \x20   struct TWWidget *instance = (struct TWWidget *) (*env)->GetLongField(env, thisObject, thisHandleFieldID);\n\
         \x20   jint jresult = (jint) TWWidgetCount(instance);\n\
         \x20   return jresult;\n\
         }\n"
    ));
}

#[test]
fn JniHelper___method___converts_arguments_and_releases_them() {
    let out = render(WIDGET, "Widget");

    assert!(out.contains(
        "Java_wallet_core_jni_Widget_sign(JNIEnv *env, jobject thisObject, jbyteArray digest, jobject curve) {\n"
    ));
    assert!(out.contains("    TWData *digestData = TWDataCreateWithJByteArray(env, digest);\n"));
    assert!(out.contains("    jint curveValue = (*env)->CallIntMethod(env, curve, curveValueMethodID);\n"));
    assert!(out.contains("    TWData *cresult = TWWidgetSign(instance, digestData, (enum TWCurve) curveValue);\n"));
    assert!(out.contains("    if (cresult != NULL) {\n        jresult = TWDataJByteArray(cresult, env);\n    }\n    TWDataDelete(digestData);\n    return jresult;\n"));
}

#[test]
fn JniHelper___static_factory___wraps_nullable_handle() {
    let out = render(WIDGET, "Widget");

    assert!(out.contains(
        "JNIEXPORT jobject JNICALL Java_wallet_core_jni_Widget_createWithName(JNIEnv *env, jclass thisClass, jstring name) {\n\
         \x20   TWString *nameString = TWStringCreateWithJString(env, name);\n\
         \x20   struct TWWidget *cresult = TWWidgetCreateWithName(nameString);\n\
         \x20   jobject jresult = NULL;\n\
         \x20   if (cresult != NULL) {\n\
         \x20       jclass jresultClass = (*env)->FindClass(env, \"wallet/core/jni/Widget\");\n\
         \x20       jmethodID jresultMethodID = (*env)->GetStaticMethodID(env, jresultClass, \"createFromNative\", \"(J)Lwallet/core/jni/Widget;\");\n\
         \x20       jresult = (*env)->CallStaticObjectMethod(env, jresultClass, jresultMethodID, (jlong) cresult);\n\
         \x20   }\n\
         \x20   TWStringDelete(nameString);\n\
         \x20   return jresult;\n\
         }\n"
    ));
}

#[test]
fn JniHelper___void_method___has_no_return() {
    let out = render(WIDGET, "Widget");

    assert!(out.contains("    TWWidgetDelete(instance);\n}\n"));
}

#[test]
fn JniHelper___equal___uses_equals_symbol() {
    let out = render(WIDGET, "Widget");

    assert!(out.contains("Java_wallet_core_jni_Widget_equals(JNIEnv *env, jobject thisObject, jobject rhs)"));
    assert!(out.contains("    jboolean jresult = (jboolean) TWWidgetEqual(instance, rhsInstance);\n"));
}

#[test]
fn JniHelper___enum_receiver___reads_value() {
    let out = render(COIN, "Coin");

    assert!(out.contains("    enum TWCoin instance = (enum TWCoin) thisValue;\n"));
    assert!(out.contains("    jlong jresult = (jlong) TWCoinDecimals(instance);\n"));
    assert!(out.contains("\"createFromValue\", \"(I)Lwallet/core/jni/Coin;\""));
}

#[test]
fn JniHelper___struct_receiver___releases_bytes() {
    let out = render(POINT, "Point");

    assert!(out.contains("    jboolean jresult = (jboolean) TWPointIsValid(*instance);\n"));
    assert!(out.contains(
        "    (*env)->ReleaseByteArrayElements(env, thisBytesArray, thisBytesBuffer, JNI_ABORT);\n    return jresult;\n"
    ));
    assert!(out.contains("    struct TWPoint cresult = TWPointAdd(*lhsInstance, *rhsInstance);\n"));
    assert!(out.contains("\"createFromNative\", \"([B)Lwallet/core/jni/Point;\""));
}

#[test]
fn JniHelper___messages___serialize_and_parse() {
    let out = render(SIGNER, "Signer");

    assert!(out.contains("    TWData *inputData = TWDataCreateWithJByteArray(env, inputBytes);\n"));
    assert!(out.contains("(*env)->FindClass(env, \"wallet/core/jni/proto/Ethereum$SigningOutput\")"));
    assert!(out.contains("\"parseFrom\", \"([B)Lwallet/core/jni/proto/Ethereum$SigningOutput;\""));
    assert!(out.contains("    TWDataDelete(inputData);\n"));
}

#[test]
fn JniHelper___property_with_result_buffer___takes_the_buffer() {
    let out = render(BUFFER, "Buffer");

    assert!(out.contains(
        "Java_wallet_core_jni_Buffer_contents(JNIEnv *env, jobject thisObject, jbyteArray result)"
    ));
    assert!(out.contains("TWBufferContents(instance, resultData)"));
}

#[test]
fn JniHelper___declarations_without_members___render_nothing() {
    assert_eq!(render(EMPTY, "Empty"), "");
    assert_eq!(render(COLOR, "Color"), "");
}

#[test]
fn JniHelper___umbrella___includes_each_unit() {
    let widget = test_support::unit(WIDGET, "Widget");
    let coin = test_support::unit(COIN, "Coin");

    let file = helper().umbrella(&[&widget, &coin]).unwrap().unwrap();

    assert_eq!(file.path, PathBuf::from("jni/cpp/generated/TWJNIGenerated.h"));
    assert_eq!(
        file.contents,
        "#pragma once\n\n#include <TrustWalletCore/TWWidget.h>\n#include <TrustWalletCore/TWCoin.h>\n"
    );
}
